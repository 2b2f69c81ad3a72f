pub mod securitytrails;

pub use securitytrails::SecurityTrailsClient;
