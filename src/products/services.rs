use tracing::error;
use uuid::Uuid;

use super::dto::{ProductInput, ProductView};
use super::repo;
use crate::gateway::{Gateway, PRODUCTS};
use crate::listing::{self, FieldSet, ListQuery, PageResult};
use crate::outcome::{existing_record, Outcome};

pub const PRODUCT_FIELDS: FieldSet = FieldSet {
    searchable: &["name", "category"],
    default_sort: "name",
    alternate_sort: "price",
};

pub async fn list_products(
    gw: &dyn Gateway,
    query: &ListQuery,
) -> anyhow::Result<PageResult<ProductView>> {
    let records = repo::list(gw).await?;
    Ok(listing::process(records, query, &PRODUCT_FIELDS, |r| ProductView::from(r)))
}

pub async fn get_product(gw: &dyn Gateway, id: &str) -> anyhow::Result<Outcome<ProductView>> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Ok(Outcome::NotFound);
    };
    Ok(match repo::get(gw, id).await? {
        Some(record) => Outcome::Done(ProductView::from(&record)),
        None => Outcome::NotFound,
    })
}

pub async fn create_product(gw: &dyn Gateway, input: &ProductInput) -> Outcome<ProductView> {
    match repo::create(gw, input).await {
        Ok(record) => Outcome::Done(ProductView::from(&record)),
        Err(e) => {
            error!(error = %e, "create product failed");
            Outcome::Failed
        }
    }
}

pub async fn update_product(gw: &dyn Gateway, id: &str, input: &ProductInput) -> Outcome<Uuid> {
    let id = match existing_record(gw, PRODUCTS, id).await {
        Outcome::Done(record) => record.id,
        Outcome::NotFound => return Outcome::NotFound,
        Outcome::Failed => return Outcome::Failed,
    };
    match repo::update(gw, id, input).await {
        Ok(_) => Outcome::Done(id),
        Err(e) => {
            error!(error = %e, %id, "update product failed");
            Outcome::Failed
        }
    }
}

pub async fn delete_product(gw: &dyn Gateway, id: &str) -> Outcome<Uuid> {
    let id = match existing_record(gw, PRODUCTS, id).await {
        Outcome::Done(record) => record.id,
        Outcome::NotFound => return Outcome::NotFound,
        Outcome::Failed => return Outcome::Failed,
    };
    match repo::delete(gw, id).await {
        Ok(_) => Outcome::Done(id),
        Err(e) => {
            error!(error = %e, %id, "delete product failed");
            Outcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;
    use serde_json::Number;

    fn input(name: &str, price: f64, category: &str, quantity: i64) -> ProductInput {
        ProductInput {
            name: name.into(),
            price: Number::from_f64(price).unwrap(),
            category: category.into(),
            quantity: quantity.into(),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips_input_fields() {
        let gw = MemoryGateway::new();
        let created = match create_product(&gw, &input("Kettle", 24.5, "Kitchen", 3)).await {
            Outcome::Done(p) => p,
            other => panic!("unexpected {other:?}"),
        };
        let fetched = get_product(&gw, &created.id.to_string()).await.unwrap();
        assert_eq!(fetched, Outcome::Done(created.clone()));
        assert_eq!(created.name.as_deref(), Some("Kettle"));
        assert_eq!(created.price.as_ref().and_then(Number::as_f64), Some(24.5));
        assert_eq!(created.category.as_deref(), Some("Kitchen"));
        assert_eq!(created.quantity, Some(3));
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() {
        let gw = MemoryGateway::new();
        assert_eq!(get_product(&gw, "not-a-uuid").await.unwrap(), Outcome::NotFound);
        let id = Uuid::new_v4().to_string();
        assert_eq!(get_product(&gw, &id).await.unwrap(), Outcome::NotFound);
        assert_eq!(update_product(&gw, &id, &input("a", 1.0, "b", 1)).await, Outcome::NotFound);
        assert_eq!(delete_product(&gw, &id).await, Outcome::NotFound);
    }

    #[tokio::test]
    async fn update_and_delete_existing() {
        let gw = MemoryGateway::new();
        let Outcome::Done(p) = create_product(&gw, &input("Mug", 4.0, "Kitchen", 10)).await else {
            panic!("create failed");
        };
        let id = p.id.to_string();

        assert_eq!(
            update_product(&gw, &id, &input("Big Mug", 6.0, "Kitchen", 8)).await,
            Outcome::Done(p.id)
        );
        let Outcome::Done(updated) = get_product(&gw, &id).await.unwrap() else {
            panic!("missing after update");
        };
        assert_eq!(updated.name.as_deref(), Some("Big Mug"));
        assert_eq!(updated.quantity, Some(8));

        assert_eq!(delete_product(&gw, &id).await, Outcome::Done(p.id));
        assert_eq!(get_product(&gw, &id).await.unwrap(), Outcome::NotFound);
    }

    #[tokio::test]
    async fn list_applies_search_and_price_sort() {
        let gw = MemoryGateway::new();
        for (name, price, category) in [
            ("Chips", 3.0, "Snacks"),
            ("Soap", 2.0, "Household"),
            ("Pretzels", 1.5, "snacks"),
        ] {
            create_product(&gw, &input(name, price, category, 1)).await;
        }
        let query = ListQuery {
            page_number: 1,
            page_size: 10,
            search: Some("category:SNACK".into()),
            sort: Some("price:asc".into()),
        };
        let page = list_products(&gw, &query).await.unwrap();
        let names: Vec<_> = page.data.iter().filter_map(|p| p.name.clone()).collect();
        assert_eq!(names, vec!["Pretzels", "Chips"]);
        assert_eq!(page.total_pages, Some(1));
    }
}
