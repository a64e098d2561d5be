pub mod domain;
pub mod ports;

pub use domain::{AuthSession, CardDetail, Comment, User, UserCredentials};
pub use ports::{DatabaseService, PortError, PortResult};
