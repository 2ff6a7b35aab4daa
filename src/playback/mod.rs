pub(crate) mod cancel;
pub(crate) mod capture;
pub(crate) mod clock;
pub(crate) mod controller;
