//! OpenAPI fragment describing the Books routes.

use serde_json::{json, Value};

fn fail_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/ErrorResponse"
                }
            }
        }
    })
}

fn success_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": schema
            }
        }
    })
}

fn book_id_parameter() -> Value {
    json!({
        "name": "book_id",
        "in": "path",
        "required": true,
        "schema": {
            "type": "string"
        }
    })
}

fn flag_parameter(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "in": "query",
        "required": false,
        "description": description,
        "schema": {
            "type": "string",
            "enum": ["0", "1"]
        }
    })
}

fn payload_body() -> Value {
    json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": {
                    "$ref": "#/components/schemas/BookPayload"
                }
            }
        }
    })
}

fn envelope(data: Option<Value>, with_message: bool) -> Value {
    let mut properties = json!({
        "status": {
            "type": "string",
            "enum": ["success"]
        }
    });
    let mut required = vec!["status"];

    if with_message {
        properties["message"] = json!({"type": "string"});
        required.push("message");
    }
    if let Some(data) = data {
        properties["data"] = data;
        required.push("data");
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

pub fn fragment() -> Value {
    json!({
        "paths": {
            "/books": {
                "post": {
                    "summary": "Add a book",
                    "tags": ["Books"],
                    "requestBody": payload_body(),
                    "responses": {
                        "201": success_response(
                            "Book added",
                            envelope(
                                Some(json!({
                                    "type": "object",
                                    "properties": {"bookId": {"type": "string"}},
                                    "required": ["bookId"]
                                })),
                                true,
                            ),
                        ),
                        "400": fail_response("Missing name, or readPage greater than pageCount"),
                        "500": fail_response("Book could not be stored")
                    }
                },
                "get": {
                    "summary": "List books",
                    "description": "Only the last supplied filter of name, reading, finished is applied.",
                    "tags": ["Books"],
                    "parameters": [
                        {
                            "name": "name",
                            "in": "query",
                            "required": false,
                            "description": "Case-insensitive substring of the book name",
                            "schema": {"type": "string"}
                        },
                        flag_parameter("reading", "1 for books being read, 0 otherwise"),
                        flag_parameter("finished", "1 for finished books, 0 otherwise")
                    ],
                    "responses": {
                        "200": success_response(
                            "Book projections in insertion order",
                            envelope(
                                Some(json!({
                                    "type": "object",
                                    "properties": {
                                        "books": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/BookSummary"}
                                        }
                                    },
                                    "required": ["books"]
                                })),
                                false,
                            ),
                        )
                    }
                }
            },
            "/books/{book_id}": {
                "get": {
                    "summary": "Get a book",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "200": success_response(
                            "The book",
                            envelope(
                                Some(json!({
                                    "type": "object",
                                    "properties": {"book": {"$ref": "#/components/schemas/Book"}},
                                    "required": ["book"]
                                })),
                                false,
                            ),
                        ),
                        "404": fail_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace a book",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "requestBody": payload_body(),
                    "responses": {
                        "200": success_response("Book updated", envelope(None, true)),
                        "400": fail_response("Missing name, or readPage greater than pageCount"),
                        "404": fail_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [book_id_parameter()],
                    "responses": {
                        "200": success_response("Book deleted", envelope(None, true)),
                        "404": fail_response("Book not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string", "description": "16-character identifier"},
                        "name": {"type": "string"},
                        "year": {"type": "integer"},
                        "author": {"type": "string"},
                        "summary": {"type": "string"},
                        "publisher": {"type": "string"},
                        "pageCount": {"type": "integer", "minimum": 0},
                        "readPage": {"type": "integer", "minimum": 0},
                        "finished": {"type": "boolean", "description": "readPage == pageCount"},
                        "reading": {"type": "boolean"},
                        "insertedAt": {"type": "string", "format": "date-time"},
                        "updatedAt": {"type": "string", "format": "date-time"}
                    },
                    "required": [
                        "id", "name", "year", "author", "summary", "publisher",
                        "pageCount", "readPage", "finished", "reading",
                        "insertedAt", "updatedAt"
                    ]
                },
                "BookPayload": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "year": {"type": "integer"},
                        "author": {"type": "string"},
                        "summary": {"type": "string"},
                        "publisher": {"type": "string"},
                        "pageCount": {"type": "integer", "minimum": 0},
                        "readPage": {"type": "integer", "minimum": 0},
                        "reading": {"type": "boolean"}
                    },
                    "required": ["name"]
                },
                "BookSummary": {
                    "type": "object",
                    "properties": {
                        "id": {"type": "string"},
                        "name": {"type": "string"},
                        "publisher": {"type": "string"}
                    },
                    "required": ["id", "name", "publisher"]
                }
            }
        }
    })
}
