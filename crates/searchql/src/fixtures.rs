//! Example models lifted from the original service's `Guild`/`Message`/
//! `User` tables, built with the declarative [`Model`] registry.
//!
//! These are demo/test fixtures, not part of this crate's public
//! contract — they exist so `search-cli` and the compiler's own test
//! suite have something concrete to compile queries against.

use std::sync::OnceLock;

use crate::model::{FieldType, Model};

pub fn guild() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| {
        Model::new("guilds", "id")
            .field("id", FieldType::Snowflake)
            .field("owner_id", FieldType::Snowflake)
            .field("name", FieldType::Text)
            .optional_field("icon", FieldType::Text)
            .field("is_currently_joined", FieldType::Bool)
            .reference("owner", user, "owner_id", "id", false)
    })
}

pub fn message() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| {
        Model::new("messages", "id")
            .field("id", FieldType::Snowflake)
            .field("guild_id", FieldType::Snowflake)
            .field("channel_id", FieldType::Snowflake)
            .optional_field("author_id", FieldType::Snowflake)
            .optional_field("webhook_id", FieldType::Snowflake)
            .field("tts", FieldType::Bool)
            .field("type", FieldType::Int)
            .fts("content")
            .field("embeds", FieldType::Json)
            .field("mention_everyone", FieldType::Bool)
            .field("flags", FieldType::Int)
            .field("activity", FieldType::Json)
            .field("application", FieldType::Json)
            .field("created_at", FieldType::Timestamp)
            .optional_field("edited_at", FieldType::Timestamp)
            .field("deleted", FieldType::Bool)
            .reference("guild", guild, "guild_id", "id", true)
            .reference("author", user, "author_id", "id", true)
    })
}

pub fn user() -> &'static Model {
    static MODEL: OnceLock<Model> = OnceLock::new();
    MODEL.get_or_init(|| {
        Model::new("users", "id")
            .field("id", FieldType::Snowflake)
            .field("name", FieldType::Text)
            .field("discriminator", FieldType::Int)
            .optional_field("avatar", FieldType::Text)
            .field("bot", FieldType::Bool)
            .field("system", FieldType::Bool)
    })
}

/// Looks a fixture model up by its table name, for the CLI's `<model>`
/// argument.
pub fn by_name(name: &str) -> Option<&'static Model> {
    match name {
        "guild" | "guilds" => Some(guild()),
        "message" | "messages" => Some(message()),
        "user" | "users" => Some(user()),
        _ => None,
    }
}
