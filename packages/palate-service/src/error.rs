pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<palate_storage::Error> for Error {
	fn from(err: palate_storage::Error) -> Self {
		match err {
			palate_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			palate_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}
