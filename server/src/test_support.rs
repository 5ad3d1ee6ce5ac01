//! Fixtures for tests that drive the router against Postgres.
//!
//! These tests read `DATABASE_URL` and skip themselves when it is unset, so
//! `cargo test` stays green on machines without a database. Every fixture
//! row gets a random suffix, which lets tests share one database and run in
//! parallel.

use crate::api;
use crate::auth::create_session;
use crate::config::Config;
use crate::db::{self, DbPool};
use crate::models::{NewIngredient, NewRecipe, NewRecipeIngredient, NewUser, User};
use crate::schema::{ingredients, recipe_ingredients, recipes, users};
use crate::AppState;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;

static POOL: OnceLock<Option<Arc<DbPool>>> = OnceLock::new();

fn shared_pool() -> Option<Arc<DbPool>> {
    POOL.get_or_init(|| {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = db::create_pool(&url).expect("test database should accept connections");
        Some(Arc::new(pool))
    })
    .clone()
}

pub fn unique(prefix: &str) -> String {
    format!("{prefix}{}", rand::random::<u32>())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("response body should be JSON")
    }
}

pub struct TestApp {
    state: AppState,
}

impl TestApp {
    /// `None` when no test database is configured.
    pub fn new() -> Option<Self> {
        let pool = shared_pool()?;
        let config = Config {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".parse().expect("valid socket address"),
            page_size: 6,
            max_page_size: 100,
        };
        Some(Self {
            state: AppState {
                pool,
                config: Arc::new(config),
            },
        })
    }

    pub fn conn(&self) -> PooledConnection<ConnectionManager<PgConnection>> {
        self.state.pool.get().expect("test pool should hand out connections")
    }

    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let request = request.body(Body::empty()).expect("valid request");

        let response = api::router()
            .with_state(self.state.clone())
            .oneshot(request)
            .await
            .expect("router is infallible");

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");

        TestResponse {
            status,
            content_type,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Inserts a plain user and opens a session for it.
    pub fn user(&self) -> (User, String) {
        let mut conn = self.conn();
        let username = unique("cook");
        let email = format!("{username}@example.com");

        let user: User = diesel::insert_into(users::table)
            .values(NewUser {
                email: &email,
                username: &username,
                first_name: "Test",
                last_name: "Cook",
                password_hash: "unused",
                is_staff: false,
                is_superuser: false,
            })
            .returning(User::as_returning())
            .get_result(&mut conn)
            .expect("insert user");

        let token = create_session(&mut conn, user.id).expect("create session");
        (user, token)
    }

    /// Inserts an ingredient with a randomized name, returning (id, name).
    pub fn ingredient(&self, name: &str, unit: &str) -> (i32, String) {
        let name = unique(name);
        let id = diesel::insert_into(ingredients::table)
            .values(NewIngredient {
                name: &name,
                measurement_unit: unit,
            })
            .returning(ingredients::id)
            .get_result(&mut self.conn())
            .expect("insert ingredient");
        (id, name)
    }

    /// Inserts a recipe by `author_id` using `(ingredient_id, amount)` pairs.
    pub fn recipe(&self, author_id: i32, amounts: &[(i32, i32)]) -> i32 {
        let mut conn = self.conn();
        let recipe_id: i32 = diesel::insert_into(recipes::table)
            .values(NewRecipe {
                author_id,
                name: &unique("Recipe "),
                text: "Mix and bake.",
                image: None,
                cooking_time: 30,
            })
            .returning(recipes::id)
            .get_result(&mut conn)
            .expect("insert recipe");

        let rows: Vec<NewRecipeIngredient> = amounts
            .iter()
            .map(|&(ingredient_id, amount)| NewRecipeIngredient {
                recipe_id,
                ingredient_id,
                amount,
            })
            .collect();
        if !rows.is_empty() {
            diesel::insert_into(recipe_ingredients::table)
                .values(&rows)
                .execute(&mut conn)
                .expect("insert recipe ingredients");
        }

        recipe_id
    }
}
