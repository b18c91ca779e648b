pub mod handlers;
pub mod models;
pub mod store;

use async_trait::async_trait;
use axum::{
    routing::{get, put},
    Router,
};
use libris_kernel::{AppState, InitCtx, Module, TableSchema};
use serde_json::json;

/// Reviews resource. Each review belongs to one user and one book.
pub struct ReviewsModule;

impl ReviewsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router<AppState> {
        Router::new()
            .route(
                "/",
                get(handlers::list_reviews).post(handlers::create_review),
            )
            .route(
                "/{id}",
                put(handlers::update_review).delete(handlers::delete_review),
            )
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let id_parameter = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let error = json!({
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List all reviews with their book and user",
                        "tags": ["Reviews"],
                        "responses": {
                            "200": {
                                "description": "Reviews; dangling owners appear as Unknown Book/User",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/ReviewListing" }
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create review",
                        "tags": ["Reviews"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/CreateReview" }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Review created",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "400": {
                                "description": "Missing fields or unknown user/book",
                                "content": error["content"]
                            }
                        }
                    }
                },
                "/{id}": {
                    "put": {
                        "summary": "Update content and/or rating",
                        "tags": ["Reviews"],
                        "parameters": id_parameter,
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ReviewChanges" }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Review updated",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Review" }
                                    }
                                }
                            },
                            "404": { "description": "Review not found", "content": error["content"] }
                        }
                    },
                    "delete": {
                        "summary": "Delete review",
                        "tags": ["Reviews"],
                        "parameters": id_parameter,
                        "responses": {
                            "200": {
                                "description": "Review deleted",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Message" }
                                    }
                                }
                            },
                            "404": { "description": "Review not found", "content": error["content"] }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "content": { "type": "string" },
                            "rating": { "type": "integer", "format": "int64" },
                            "user_id": { "type": "integer", "format": "int64" },
                            "book_id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["id", "content", "rating", "user_id", "book_id"]
                    },
                    "CreateReview": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string" },
                            "rating": { "type": "integer", "format": "int64" },
                            "user_id": { "type": "integer", "format": "int64" },
                            "book_id": { "type": "integer", "format": "int64" }
                        },
                        "required": ["content", "rating", "user_id", "book_id"]
                    },
                    "ReviewChanges": {
                        "type": "object",
                        "properties": {
                            "content": { "type": "string" },
                            "rating": { "type": "integer", "format": "int64" }
                        }
                    },
                    "BookReview": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "content": { "type": "string" },
                            "rating": { "type": "integer", "format": "int64" },
                            "user": { "$ref": "#/components/schemas/UserSummary" }
                        },
                        "required": ["id", "content", "rating", "user"]
                    },
                    "ReviewListing": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "content": { "type": "string" },
                            "rating": { "type": "integer", "format": "int64" },
                            "book": { "$ref": "#/components/schemas/BookSummary" },
                            "user": { "$ref": "#/components/schemas/UserSummary" }
                        },
                        "required": ["id", "content", "rating", "book", "user"]
                    }
                }
            }
        }))
    }

    fn schema(&self) -> Vec<TableSchema> {
        vec![TableSchema {
            id: "001_reviews",
            ddl: r#"
                CREATE TABLE IF NOT EXISTS reviews (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    content TEXT NOT NULL,
                    rating  INTEGER NOT NULL,
                    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                    book_id INTEGER NOT NULL REFERENCES books(id)
                );
                CREATE INDEX IF NOT EXISTS reviews_book_id ON reviews (book_id);
                CREATE INDEX IF NOT EXISTS reviews_user_id ON reviews (user_id);
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module stopped");
        Ok(())
    }
}

/// Create a new instance of the reviews module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(ReviewsModule::new())
}
