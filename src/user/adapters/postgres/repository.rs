//! `PostgreSQL` repository implementation for user accounts.

use super::models::{NewUserRow, UserChangeset, UserRow};
use crate::outcome::{Failure, Outcome};
use crate::pagination::{Page, Pagination};
use crate::persistence::{PgPool, pool::run_blocking, schema::users};
use crate::user::{
    domain::{NewUser, User, UserId},
    ports::{UserFilter, UserRepository},
};
use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_id(&self, id: UserId) -> Outcome<Option<User>> {
        run_blocking(&self.pool, move |connection| {
            users::table
                .find(id.value())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?
                .map(UserRow::into_user)
                .transpose()
        })
        .await
    }

    async fn find_by_username(&self, username: &str) -> Outcome<Option<User>> {
        let lookup = username.to_owned();
        run_blocking(&self.pool, move |connection| {
            users::table
                .filter(users::username.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()?
                .map(UserRow::into_user)
                .transpose()
        })
        .await
    }

    async fn find_page(&self, filter: UserFilter, pagination: Pagination) -> Outcome<Page<User>> {
        run_blocking(&self.pool, move |connection| {
            let total: i64 = filtered_users(filter).count().get_result(connection)?;
            let rows = filtered_users(filter)
                .order(users::id.asc())
                .limit(pagination.limit())
                .offset(pagination.offset())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)?;
            let results = rows
                .into_iter()
                .map(UserRow::into_user)
                .collect::<Outcome<Vec<_>>>()?;
            Ok(Page {
                results,
                total: u64::try_from(total).map_err(Failure::database)?,
            })
        })
        .await
    }

    async fn create(&self, user: &NewUser) -> Outcome<User> {
        let row = NewUserRow::from(user);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(users::table)
                .values(&row)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)?
                .into_user()
        })
        .await
    }

    async fn update(&self, user: &User) -> Outcome<User> {
        let id = user.id();
        let changes = UserChangeset::from(user);
        run_blocking(&self.pool, move |connection| {
            diesel::update(users::table.find(id.value()))
                .set(&changes)
                .returning(UserRow::as_returning())
                .get_result::<UserRow>(connection)
                .optional()?
                .ok_or_else(|| Failure::not_found("User not found"))?
                .into_user()
        })
        .await
    }
}

fn filtered_users(filter: UserFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();
    if let Some(role) = filter.role {
        query = query.filter(users::role.eq(role.as_str()));
    }
    if let Some(status) = filter.status {
        query = query.filter(users::status.eq(status.as_str()));
    }
    query
}
