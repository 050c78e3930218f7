use axum::{
  Json,
  extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
  engine,
  entity::{affiliate, product, snapshot},
  prelude::*,
  state::AppState,
  sv,
};

#[derive(Serialize)]
pub struct Status {
  success: bool,
  msg: Option<String>,
}

impl Status {
  fn ok() -> Json<Self> {
    Json(Self { success: true, msg: None })
  }
}

pub async fn health() -> Json<Status> {
  Status::ok()
}

pub async fn products(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<product::Model>>> {
  Ok(Json(sv::Product::new(&app.db).all().await?))
}

#[derive(Serialize)]
pub struct RosterView {
  affiliates: Vec<affiliate::Model>,
  /// False when some `parent_id` no longer resolves (e.g. after a
  /// `detach` delete); callers should surface that instead of drawing
  /// a broken tree.
  valid_hierarchy: bool,
}

pub async fn roster(
  State(app): State<Arc<AppState>>,
) -> Result<Json<RosterView>> {
  let affiliates = sv::Roster::new(&app.db).all().await?;
  let snapshot = engine::Roster::new(
    affiliates.iter().cloned().map(Into::into).collect(),
  );
  Ok(Json(RosterView {
    valid_hierarchy: snapshot.is_valid_hierarchy(),
    affiliates,
  }))
}

/// The commissions table: ranks are refreshed, then every affiliate is
/// reported in roster order.
pub async fn reports(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<engine::AffiliateReport>>> {
  let rows = sv::Report::new(&app.db)
    .commissions(app.config.exchange_rate)
    .await?;
  Ok(Json(rows))
}

#[derive(Deserialize)]
pub struct NewAffiliate {
  name: String,
}

pub async fn create_root(
  State(app): State<Arc<AppState>>,
  Json(req): Json<NewAffiliate>,
) -> Result<Json<affiliate::Model>> {
  Ok(Json(sv::Roster::new(&app.db).create_root(&req.name).await?))
}

pub async fn add_subordinate(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(req): Json<NewAffiliate>,
) -> Result<Json<affiliate::Model>> {
  Ok(Json(sv::Roster::new(&app.db).add_subordinate(&id, &req.name).await?))
}

pub async fn edit_affiliate(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(changes): Json<sv::roster::EditAffiliate>,
) -> Result<Json<affiliate::Model>> {
  Ok(Json(sv::Roster::new(&app.db).edit(&id, changes).await?))
}

pub async fn delete_affiliate(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Status>> {
  sv::Roster::new(&app.db).delete(&id, app.config.delete_policy).await?;
  Ok(Status::ok())
}

#[derive(Deserialize)]
pub struct PurchaseReq {
  items: Vec<sv::purchase::PurchaseItem>,
}

pub async fn record_purchase(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
  Json(req): Json<PurchaseReq>,
) -> Result<Json<sv::purchase::Receipt>> {
  Ok(Json(sv::Purchase::new(&app.db).record(&id, &req.items).await?))
}

#[derive(Deserialize, Default)]
pub struct SaveProject {
  name: Option<String>,
}

pub async fn save_project(
  State(app): State<Arc<AppState>>,
  Json(req): Json<SaveProject>,
) -> Result<Json<snapshot::Model>> {
  Ok(Json(sv::Project::new(&app.db).save(req.name).await?))
}

pub async fn list_projects(
  State(app): State<Arc<AppState>>,
) -> Result<Json<Vec<snapshot::Model>>> {
  Ok(Json(sv::Project::new(&app.db).list().await?))
}

#[derive(Serialize)]
pub struct Restored {
  affiliates: usize,
}

pub async fn open_project(
  State(app): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Restored>> {
  let affiliates = sv::Project::new(&app.db).open(&id).await?;
  Ok(Json(Restored { affiliates }))
}
