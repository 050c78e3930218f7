use crate::{entity::product, prelude::*};

/// The 4Life catalog the projection works against. Reference data only;
/// purchases read points and price from here.
const CATALOG: &[(&str, &str, i32, i64)] = &[
  ("#2111190415", "Fast Start Best Seller", 400, 371359),
  ("#2111193430", "Fast Start Core", 400, 371359),
  ("#2111193503", "Fast Start Pack Desafio", 400, 350928),
  ("#2111124042", "Transfer Factor Mastigável", 40, 32727),
  ("#2111124070", "4Life Transfer Factor® Tri-Factor®", 40, 30396),
  ("#2111124075", "Transfer Factor Plus", 55, 39142),
  ("#2111124087", "Glutamine Prime", 27, 25455),
  ("#2111124110", "RioVida Burst", 27, 25665),
  ("#2111124113", "RioVida Stix", 19, 19919),
  ("#2111125404", "Transfer Factor Collagen", 23, 26866),
  ("#2111127563", "Energy Go Stix Berry", 36, 29480),
  ("#2111127568", "PRO-TF® Sabor Baunilha", 26, 46777),
  ("#2111128087", "NutraStart® Chocolate", 25, 33920),
  ("#2111128095", "4Life BIOEFA", 17, 15541),
  ("#2111155777", "Kit Builder", 150, 122909),
  ("#2111193492", "Power Pack", 255, 196364),
];

pub struct Product<'a> {
  db: &'a DatabaseConnection,
}

impl<'a> Product<'a> {
  pub fn new(db: &'a DatabaseConnection) -> Self {
    Self { db }
  }

  /// Loads the static catalog into an empty products table. Does nothing
  /// when products already exist.
  pub async fn seed(&self) -> Result<()> {
    if product::Entity::find().count(self.db).await? > 0 {
      return Ok(());
    }

    let models = CATALOG.iter().map(|&(id, name, points, price_cents)| {
      product::ActiveModel {
        id: Set(id.to_string()),
        name: Set(name.to_string()),
        points: Set(points),
        price_cents: Set(price_cents),
      }
    });
    product::Entity::insert_many(models).exec(self.db).await?;

    info!("seeded {} catalog products", CATALOG.len());
    Ok(())
  }

  pub async fn all(&self) -> Result<Vec<product::Model>> {
    let products = product::Entity::find()
      .order_by_asc(product::Column::Id)
      .all(self.db)
      .await?;
    Ok(products)
  }

  pub async fn by_id(&self, id: &str) -> Result<Option<product::Model>> {
    let product = product::Entity::find_by_id(id).one(self.db).await?;
    Ok(product)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::sv::test_utils::test_db;

  #[tokio::test]
  async fn test_seed_loads_catalog_once() {
    let db = test_db::setup().await;
    let sv = Product::new(&db);

    sv.seed().await.unwrap();
    sv.seed().await.unwrap();

    let products = sv.all().await.unwrap();
    assert_eq!(products.len(), CATALOG.len());
  }

  #[tokio::test]
  async fn test_by_id() {
    let db = test_db::setup().await;
    let sv = Product::new(&db);
    sv.seed().await.unwrap();

    let product = sv.by_id("#2111155777").await.unwrap().unwrap();
    assert_eq!(product.name, "Kit Builder");
    assert_eq!(product.points, 150);
    assert_eq!(product.price_cents, 122909);

    assert!(sv.by_id("#0000000000").await.unwrap().is_none());
  }
}
