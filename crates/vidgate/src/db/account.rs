// Vidgate
// Copyright (C) 2025 Throneless Tech

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::*;
use vidgate_common::{error::Result, role::Role};

use super::entities::{prelude::*, *};

pub async fn get_by_identity<C: ConnectionTrait>(
    identity: i64,
    db: &C,
) -> Result<Option<account::Model>> {
    let entry = Account::find()
        .filter(account::Column::Identity.eq(identity))
        .one(db)
        .await?;

    Ok(entry)
}

pub async fn get_by_id<C: ConnectionTrait>(id: i32, db: &C) -> Result<Option<account::Model>> {
    let entry = Account::find_by_id(id).one(db).await?;

    Ok(entry)
}

/// Inserts an account for `identity` unless one exists. The unique index on
/// `identity` decides between concurrent callers; returns true only for the
/// caller whose row was written.
pub async fn create_if_absent<C: ConnectionTrait>(
    identity: i64,
    username: Option<&str>,
    secret_code: Option<&str>,
    role: Role,
    db: &C,
) -> Result<bool> {
    let entry = account::ActiveModel {
        identity: ActiveValue::Set(identity),
        username: ActiveValue::Set(username.map(str::to_owned)),
        role: ActiveValue::Set(role),
        secret_code: ActiveValue::Set(secret_code.map(str::to_owned)),
        ..Default::default()
    };

    let inserted = Account::insert(entry)
        .on_conflict(
            OnConflict::column(account::Column::Identity)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(inserted > 0)
}

/// Sets the secret code of an account that has none yet. Returns false if
/// the account already carries a code.
pub async fn claim_secret_code<C: ConnectionTrait>(id: i32, code: &str, db: &C) -> Result<bool> {
    let res = Account::update_many()
        .col_expr(account::Column::SecretCode, Expr::value(code.to_owned()))
        .filter(account::Column::Id.eq(id))
        .filter(account::Column::SecretCode.is_null())
        .exec(db)
        .await?;

    Ok(res.rows_affected > 0)
}

pub async fn set_username<C: ConnectionTrait>(
    id: i32,
    username: Option<&str>,
    db: &C,
) -> Result<()> {
    Account::update_many()
        .col_expr(
            account::Column::Username,
            Expr::value(username.map(str::to_owned)),
        )
        .filter(account::Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Gives `identity` the role `role`, creating a code-less account if the
/// identity has never been seen.
pub async fn set_role<C: ConnectionTrait>(
    identity: i64,
    role: Role,
    db: &C,
) -> Result<account::Model> {
    if !create_if_absent(identity, None, None, role, db).await? {
        Account::update_many()
            .col_expr(account::Column::Role, Expr::value(role))
            .filter(account::Column::Identity.eq(identity))
            .exec(db)
            .await?;
    }

    let Some(entry) = get_by_identity(identity, db).await? else {
        return Err(DbErr::RecordNotFound(identity.to_string()).into());
    };
    Ok(entry)
}

/// Accounts holding at least `role`, oldest first.
pub async fn list_with_role<C: ConnectionTrait>(role: Role, db: &C) -> Result<Vec<account::Model>> {
    let roles: Vec<Role> = Role::iter().filter(|r| r.meets(role)).collect();
    let entries = Account::find()
        .filter(account::Column::Role.is_in(roles))
        .order_by(account::Column::Id, Order::Asc)
        .all(db)
        .await?;

    Ok(entries)
}

pub async fn list_identities<C: ConnectionTrait>(db: &C) -> Result<Vec<i64>> {
    let entries = Account::find()
        .select_only()
        .column(account::Column::Identity)
        .order_by(account::Column::Id, Order::Asc)
        .into_tuple::<i64>()
        .all(db)
        .await?;

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::get_test_db;

    #[tokio::test]
    async fn it_should_create_an_account_only_once() {
        let db = get_test_db().await;

        assert!(create_if_absent(7, Some("first"), Some("abc"), Role::User, &db).await.unwrap());
        assert!(!create_if_absent(7, Some("second"), Some("xyz"), Role::Admin, &db).await.unwrap());

        let entry = get_by_identity(7, &db).await.unwrap().unwrap();
        assert_eq!(entry.secret_code.as_deref(), Some("abc"));
        assert_eq!(entry.username.as_deref(), Some("first"));
        assert_eq!(entry.role, Role::User);
        assert_eq!(Account::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn it_should_claim_a_code_only_when_none_is_set() {
        let db = get_test_db().await;
        let entry = set_role(9, Role::Admin, &db).await.unwrap();
        assert_eq!(entry.secret_code, None);

        assert!(claim_secret_code(entry.id, "first", &db).await.unwrap());
        assert!(!claim_secret_code(entry.id, "second", &db).await.unwrap());

        let entry = get_by_id(entry.id, &db).await.unwrap().unwrap();
        assert_eq!(entry.secret_code.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn it_should_change_roles_in_place() {
        let db = get_test_db().await;
        create_if_absent(11, None, Some("code"), Role::User, &db).await.unwrap();

        let promoted = set_role(11, Role::Admin, &db).await.unwrap();
        assert_eq!(promoted.role, Role::Admin);
        assert_eq!(promoted.secret_code.as_deref(), Some("code"));
        set_role(12, Role::Superadmin, &db).await.unwrap();

        let admins = list_with_role(Role::Admin, &db).await.unwrap();
        let identities: Vec<i64> = admins.iter().map(|a| a.identity).collect();
        assert_eq!(identities, vec![11, 12]);
        assert_eq!(list_with_role(Role::Superadmin, &db).await.unwrap().len(), 1);
        assert_eq!(list_identities(&db).await.unwrap(), vec![11, 12]);
    }
}
