use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error("affiliate not found")]
  AffiliateNotFound,
  #[error("product not found")]
  ProductNotFound,
  #[error("snapshot not found")]
  SnapshotNotFound,
  #[error("a root affiliate already exists")]
  RootAlreadyExists,
  #[error("affiliate name already exists")]
  NameTaken,
  #[error("affiliate still has direct subordinates")]
  HasSubordinates,
  #[error("invalid arguments: {0}")]
  InvalidArgs(String),
  #[error(transparent)]
  Db(#[from] sea_orm::DbErr),
  #[error("{0}")]
  Internal(String),
}

impl Error {
  fn status(&self) -> StatusCode {
    match self {
      Error::AffiliateNotFound
      | Error::ProductNotFound
      | Error::SnapshotNotFound => StatusCode::NOT_FOUND,
      Error::RootAlreadyExists | Error::NameTaken | Error::HasSubordinates => {
        StatusCode::CONFLICT
      }
      Error::InvalidArgs(_) => StatusCode::BAD_REQUEST,
      Error::Db(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Serialize)]
struct Body {
  success: bool,
  msg: String,
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    let body = Body { success: false, msg: self.to_string() };
    (status, Json(body)).into_response()
  }
}
