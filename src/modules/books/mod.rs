pub mod handlers;
pub mod models;
pub mod store;

use async_trait::async_trait;
use axum::{routing::get, Router};
use libris_kernel::{AppState, InitCtx, Module, TableSchema};
use serde_json::json;

use crate::modules::reviews;

/// Books resource, including the per-book review listing
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

fn id_parameter() -> serde_json::Value {
    json!([{
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    }])
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route("/", get(handlers::list_books).post(handlers::create_book))
            .route(
                "/{id}",
                get(handlers::get_book)
                    .put(handlers::update_book)
                    .delete(handlers::delete_book),
            )
            .route(
                "/{id}/reviews",
                get(reviews::handlers::list_book_reviews),
            )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let book = json!({ "$ref": "#/components/schemas/Book" });
        let detail = json!({ "$ref": "#/components/schemas/BookDetail" });
        let change_body = |schema: &str| {
            json!({
                "required": true,
                "content": {
                    "application/json": {
                        "schema": { "$ref": format!("#/components/schemas/{schema}") }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books with their reviews",
                        "tags": ["Books"],
                        "responses": {
                            "200": json_response("Books", json!({ "type": "array", "items": detail }))
                        }
                    },
                    "post": {
                        "summary": "Create book",
                        "tags": ["Books"],
                        "requestBody": change_body("CreateBook"),
                        "responses": {
                            "201": json_response("Book created", book.clone()),
                            "400": error_response("Missing required fields")
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get book with its reviews",
                        "tags": ["Books"],
                        "parameters": id_parameter(),
                        "responses": {
                            "200": json_response("Book", detail.clone()),
                            "404": error_response("Book not found")
                        }
                    },
                    "put": {
                        "summary": "Update any of title, author, genre",
                        "tags": ["Books"],
                        "parameters": id_parameter(),
                        "requestBody": change_body("BookChanges"),
                        "responses": {
                            "200": json_response("Book updated", book),
                            "404": error_response("Book not found")
                        }
                    },
                    "delete": {
                        "summary": "Delete book and its reviews",
                        "tags": ["Books"],
                        "parameters": id_parameter(),
                        "responses": {
                            "200": json_response("Book deleted", json!({ "$ref": "#/components/schemas/Message" })),
                            "404": error_response("Book not found")
                        }
                    }
                },
                "/{id}/reviews": {
                    "get": {
                        "summary": "List reviews of a book",
                        "tags": ["Books", "Reviews"],
                        "parameters": id_parameter(),
                        "responses": {
                            "200": json_response(
                                "Reviews",
                                json!({ "type": "array", "items": { "$ref": "#/components/schemas/BookReview" } })
                            ),
                            "404": error_response("Book not found")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" }
                        },
                        "required": ["id", "title", "author", "genre"]
                    },
                    "BookDetail": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" },
                            "reviews": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/BookReview" }
                            }
                        },
                        "required": ["id", "title", "author", "genre", "reviews"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" }
                        },
                        "required": ["title", "author", "genre"]
                    },
                    "BookChanges": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "author": { "type": "string" },
                            "genre": { "type": "string" }
                        }
                    },
                    "BookSummary": {
                        "type": "object",
                        "properties": {
                            "id": { "type": ["integer", "null"], "format": "int64" },
                            "title": { "type": "string" }
                        },
                        "required": ["id", "title"]
                    }
                }
            }
        }))
    }

    fn schema(&self) -> Vec<TableSchema> {
        vec![TableSchema {
            id: "001_books",
            ddl: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id     INTEGER PRIMARY KEY AUTOINCREMENT,
                    title  TEXT NOT NULL,
                    author TEXT NOT NULL,
                    genre  TEXT NOT NULL
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
