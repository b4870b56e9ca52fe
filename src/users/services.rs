use tracing::error;
use uuid::Uuid;

use super::dto::UserView;
use super::repo;
use crate::auth::password::{hash_password, password_matches};
use crate::gateway::{Gateway, USERS};
use crate::listing::{self, FieldSet, ListQuery, PageResult};
use crate::outcome::{existing_record, Outcome};

pub const USER_FIELDS: FieldSet = FieldSet {
    searchable: &["name", "email"],
    default_sort: "name",
    alternate_sort: "email",
};

pub async fn list_users(gw: &dyn Gateway, query: &ListQuery) -> anyhow::Result<PageResult<UserView>> {
    let records = repo::list(gw).await?;
    Ok(listing::process(records, query, &USER_FIELDS, |r| UserView::from(r)))
}

pub async fn get_user(gw: &dyn Gateway, id: &str) -> anyhow::Result<Outcome<UserView>> {
    let Ok(id) = Uuid::parse_str(id) else {
        return Ok(Outcome::NotFound);
    };
    Ok(match repo::get(gw, id).await? {
        Some(record) => Outcome::Done(UserView::from(&record)),
        None => Outcome::NotFound,
    })
}

pub async fn create_user(
    gw: &dyn Gateway,
    name: &str,
    email: &str,
    password: &str,
) -> Outcome<UserView> {
    let hash = match hash_password(password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, "hash password failed");
            return Outcome::Failed;
        }
    };
    match repo::create(gw, name, email, &hash).await {
        Ok(record) => Outcome::Done(UserView::from(&record)),
        Err(e) => {
            error!(error = %e, "create user failed");
            Outcome::Failed
        }
    }
}

pub async fn update_user(gw: &dyn Gateway, id: &str, name: &str, email: &str) -> Outcome<UserView> {
    let id = match existing_record(gw, USERS, id).await.map(|r| r.id) {
        Outcome::Done(id) => id,
        Outcome::NotFound => return Outcome::NotFound,
        Outcome::Failed => return Outcome::Failed,
    };
    match repo::update(gw, id, name, email).await {
        Ok(_) => Outcome::Done(UserView {
            id,
            name: Some(name.to_string()),
            email: Some(email.to_string()),
        }),
        Err(e) => {
            error!(error = %e, %id, "update user failed");
            Outcome::Failed
        }
    }
}

pub async fn delete_user(gw: &dyn Gateway, id: &str) -> Outcome<Uuid> {
    let id = match existing_record(gw, USERS, id).await.map(|r| r.id) {
        Outcome::Done(id) => id,
        Outcome::NotFound => return Outcome::NotFound,
        Outcome::Failed => return Outcome::Failed,
    };
    match repo::delete(gw, id).await {
        Ok(_) => Outcome::Done(id),
        Err(e) => {
            error!(error = %e, %id, "delete user failed");
            Outcome::Failed
        }
    }
}

/// Whether `email` belongs to a user other than `excluding`.
pub async fn email_is_registered(
    gw: &dyn Gateway,
    email: &str,
    excluding: Option<Uuid>,
) -> anyhow::Result<bool> {
    let owner = repo::find_by_email(gw, email).await?;
    Ok(owner.is_some_and(|r| Some(r.id) != excluding))
}

pub async fn check_password(gw: &dyn Gateway, id: &str, password: &str) -> Outcome<bool> {
    existing_record(gw, USERS, id).await.map(|r| {
        r.str_field("password")
            .is_some_and(|hash| password_matches(password, hash))
    })
}

pub async fn change_password(gw: &dyn Gateway, id: &str, new_password: &str) -> Outcome<Uuid> {
    let id = match existing_record(gw, USERS, id).await.map(|r| r.id) {
        Outcome::Done(id) => id,
        Outcome::NotFound => return Outcome::NotFound,
        Outcome::Failed => return Outcome::Failed,
    };
    let hash = match hash_password(new_password) {
        Ok(hash) => hash,
        Err(e) => {
            error!(error = %e, %id, "hash password failed");
            return Outcome::Failed;
        }
    };
    match repo::change_password(gw, id, &hash).await {
        Ok(_) => Outcome::Done(id),
        Err(e) => {
            error!(error = %e, %id, "change password failed");
            Outcome::Failed
        }
    }
}
