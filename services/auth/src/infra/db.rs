use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, PaginatorTrait, QueryFilter, SqlErr,
    TransactionError, TransactionTrait,
};
use uuid::Uuid;

use labdesk_auth_schema::{addresses, users};

use crate::domain::repository::UserRepository;
use crate::domain::types::{Address, UserAccount};
use crate::error::AuthServiceError;

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_active_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .context("find active user by email")?;
        Ok(model.map(account_from_model))
    }

    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, AuthServiceError> {
        let count = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Email.eq(email))
                    .add(users::Column::Username.eq(username)),
            )
            .count(&self.db)
            .await
            .context("count users by email or username")?;
        Ok(count > 0)
    }

    async fn create_with_address(
        &self,
        account: &UserAccount,
        address: &Address,
    ) -> Result<(), AuthServiceError> {
        let result = self
            .db
            .transaction::<_, (), DbErr>(|txn| {
                let account = account.clone();
                let address = address.clone();
                Box::pin(async move {
                    insert_account(txn, &account).await?;
                    insert_address(txn, &account, &address).await?;
                    Ok(())
                })
            })
            .await;

        match result {
            Ok(()) => Ok(()),
            // Lost a race against a concurrent registration with the same identity.
            Err(TransactionError::Transaction(ref e)) if is_unique_violation(e) => {
                Err(AuthServiceError::DuplicateIdentity)
            }
            Err(e) => Err(anyhow::Error::new(e)
                .context("create user with address")
                .into()),
        }
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            last_login_at: Set(Some(at)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update last login")?;
        Ok(())
    }

    async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            password_hash: Set(password_hash.to_owned()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update password hash")?;
        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn insert_account(txn: &DatabaseTransaction, account: &UserAccount) -> Result<(), DbErr> {
    users::ActiveModel {
        id: Set(account.id),
        email: Set(account.email.clone()),
        username: Set(account.username.clone()),
        name: Set(account.name.clone()),
        password_hash: Set(account.password_hash.clone()),
        phone: Set(account.phone.clone()),
        is_active: Set(account.is_active),
        is_admin: Set(account.is_admin),
        last_login_at: Set(account.last_login_at),
        created_at: Set(account.created_at),
        updated_at: Set(account.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

async fn insert_address(
    txn: &DatabaseTransaction,
    account: &UserAccount,
    address: &Address,
) -> Result<(), DbErr> {
    addresses::ActiveModel {
        id: Set(Uuid::now_v7()),
        user_id: Set(account.id),
        street: Set(address.street.clone()),
        number: Set(address.number.clone()),
        complement: Set(address.complement.clone()),
        district: Set(address.district.clone()),
        city: Set(address.city.clone()),
        state: Set(address.state.clone()),
        postal_code: Set(address.postal_code.clone()),
        created_at: Set(account.created_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn account_from_model(model: users::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        email: model.email,
        username: model.username,
        name: model.name,
        password_hash: model.password_hash,
        phone: model.phone,
        is_active: model.is_active,
        is_admin: model.is_admin,
        last_login_at: model.last_login_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
