pub mod proximity;
pub mod route;
pub mod travel;
