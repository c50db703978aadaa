//! OpenAPI fragments for server-rendered page routes.

use serde_json::{json, Map, Value};

/// One HTML page route exposed by a module.
#[derive(Debug, Clone, Copy)]
pub struct PageRoute {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
}

impl PageRoute {
    pub const fn get(path: &'static str, summary: &'static str) -> Self {
        Self {
            method: "get",
            path,
            summary,
        }
    }

    pub const fn post(path: &'static str, summary: &'static str) -> Self {
        Self {
            method: "post",
            path,
            summary,
        }
    }
}

/// Build a module `paths` fragment for the given page routes.
///
/// GET operations answer with `text/html`; POST operations take an
/// urlencoded form and answer with either a redirect or the re-rendered form.
pub fn page_paths(tag: &str, routes: &[PageRoute]) -> Value {
    let mut paths = Map::new();

    for route in routes {
        let mut operation = json!({
            "summary": route.summary,
            "tags": [tag],
            "responses": {
                "200": html_response("Rendered page"),
                "404": html_response("Record not found")
            }
        });

        let params = path_params(route.path);
        if !params.is_empty() {
            operation["parameters"] = Value::Array(params);
        }

        if route.method == "post" {
            operation["requestBody"] = json!({
                "content": {
                    "application/x-www-form-urlencoded": {
                        "schema": { "type": "object" }
                    }
                }
            });
            operation["responses"]["303"] = json!({
                "description": "Redirect to the resulting page"
            });
        }

        let item = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        item[route.method] = operation;
    }

    json!({ "paths": paths })
}

fn html_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "text/html": {
                "schema": { "type": "string" }
            }
        }
    })
}

fn path_params(path: &str) -> Vec<Value> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" }
            })
        })
        .collect()
}
