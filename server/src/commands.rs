//! Administrative commands run from the server binary instead of over HTTP.

use crate::api::users::create::CreateUserRequest;
use crate::auth::hash_password;
use crate::db::DbPool;
use crate::models::{NewIngredient, NewUser};
use crate::schema::{ingredients, users};
use anyhow::{bail, Context, Result};
use diesel::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// One entry of an ingredient import file.
#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct IngredientRecord {
    pub name: String,
    pub measurement_unit: String,
}

pub struct SuperuserArgs {
    pub email: String,
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

pub fn create_superuser(pool: &DbPool, args: SuperuserArgs) -> Result<i32> {
    let request = CreateUserRequest {
        email: args.email,
        username: args.username,
        first_name: args.first_name,
        last_name: args.last_name,
        password: args.password,
    };
    request.validate()?;

    let password_hash =
        hash_password(&request.password).map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    let mut conn = pool.get()?;
    let id: i32 = diesel::insert_into(users::table)
        .values(NewUser {
            email: request.email.trim(),
            username: request.username.trim(),
            first_name: request.first_name.trim(),
            last_name: request.last_name.trim(),
            password_hash: &password_hash,
            is_staff: true,
            is_superuser: true,
        })
        .returning(users::id)
        .get_result(&mut conn)
        .context("Failed to create superuser (email or username taken?)")?;

    tracing::info!(user_id = id, "superuser created");
    Ok(id)
}

/// Parses an import file of the form `[{"name": ..., "measurement_unit": ...}]`,
/// trimming fields and dropping blank entries.
pub fn parse_ingredients(json: &str) -> Result<Vec<IngredientRecord>> {
    let records: Vec<IngredientRecord> =
        serde_json::from_str(json).context("Ingredient file is not a JSON list of {name, measurement_unit}")?;

    Ok(records
        .into_iter()
        .map(|r| IngredientRecord {
            name: r.name.trim().to_string(),
            measurement_unit: r.measurement_unit.trim().to_string(),
        })
        .filter(|r| !r.name.is_empty() && !r.measurement_unit.is_empty())
        .collect())
}

/// Inserts every record not already present, returning how many were added.
pub fn load_ingredients(pool: &DbPool, path: &Path) -> Result<usize> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = parse_ingredients(&json)?;
    if records.is_empty() {
        bail!("{} contains no ingredients", path.display());
    }

    let mut conn = pool.get()?;
    let mut inserted = 0;

    for chunk in records.chunks(1000) {
        let rows: Vec<NewIngredient> = chunk
            .iter()
            .map(|r| NewIngredient {
                name: &r.name,
                measurement_unit: &r.measurement_unit,
            })
            .collect();

        inserted += diesel::insert_into(ingredients::table)
            .values(&rows)
            .on_conflict((ingredients::name, ingredients::measurement_unit))
            .do_nothing()
            .execute(&mut conn)?;
    }

    tracing::info!(
        inserted,
        skipped = records.len() - inserted,
        "ingredients loaded from {}",
        path.display()
    );
    Ok(inserted)
}
