mod footer;
mod navbar;
pub mod ui;

pub(crate) use footer::Footer;
pub(crate) use navbar::Navbar;
