//! Request parameter extraction.
//!
//! Query string values and `application/x-www-form-urlencoded` fields go
//! through [`infer_value`]; path parameters, JSON bodies and multipart text
//! fields are taken as they are.

use std::convert::Infallible;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use serde_json::{Number, Value};
use tracing::debug;

use crate::body::Body;
use crate::context::{Files, Params, UploadedFile};
use crate::error::Error;
use crate::handler::Request;
use crate::router::ParamVec;

pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub const JSON: &str = "application/json";
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// Parameters and files taken from a request body.
#[derive(Debug, Default, PartialEq)]
pub struct ParsedBody {
    pub params: Params,
    pub files: Files,
}

/// Infer a JSON type for a textual parameter.
///
/// - empty string → `true`
/// - `"true"` / `"false"` → boolean
/// - text that parses fully as a number → number (integers stay integers)
/// - anything else → the string itself
#[must_use]
pub fn infer_value(raw: &str) -> Value {
    match raw {
        "" | "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::from(n);
            }
            raw.parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or_else(|| Value::String(raw.to_string()), Value::Number)
        }
    }
}

/// Decode a query string (without the leading `?`), inferring value types.
/// A repeated key keeps its last value.
#[must_use]
pub fn parse_query(query: Option<&str>) -> Params {
    query.map_or_else(Params::new, |q| parse_urlencoded(q.as_bytes()))
}

fn parse_urlencoded(input: &[u8]) -> Params {
    url::form_urlencoded::parse(input)
        .map(|(k, v)| (k.into_owned(), infer_value(&v)))
        .collect()
}

/// Merge parameters: query first, then path, then body. Later sources win on
/// key collisions, and path parameters are inserted as strings.
#[must_use]
pub fn merge_params(query: Params, path: &ParamVec, body: Params) -> Params {
    let mut merged = query;
    for (name, value) in path {
        merged.insert(name.to_string(), Value::String(value.clone()));
    }
    merged.extend(body);
    merged
}

/// Read and parse the request body according to its content type.
///
/// The body is buffered and put back on the request so the handler can still
/// read it. A missing or empty body, and any unrecognized content type, yield
/// empty parameters and files. Malformed JSON or multipart content is an error.
pub async fn parse_body(req: &mut Request) -> Result<ParsedBody, Error> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let bytes = std::mem::take(req.body_mut()).collect().await?;
    *req.body_mut() = Body::from(bytes.clone());

    if bytes.is_empty() {
        return Ok(ParsedBody::default());
    }

    let Some(content_type) = content_type else {
        return Ok(ParsedBody::default());
    };
    let media_type = content_type.split(';').next().unwrap_or_default().trim();

    let parsed = if media_type.eq_ignore_ascii_case(FORM_URLENCODED) {
        ParsedBody {
            params: parse_urlencoded(&bytes),
            files: Files::new(),
        }
    } else if media_type.eq_ignore_ascii_case(JSON) {
        let params = match serde_json::from_slice::<Value>(&bytes)? {
            Value::Object(map) => map,
            _ => Params::new(),
        };
        ParsedBody {
            params,
            files: Files::new(),
        }
    } else if media_type.eq_ignore_ascii_case(MULTIPART_FORM_DATA) {
        parse_multipart(bytes, &content_type).await?
    } else {
        ParsedBody::default()
    };

    debug!(
        content_type = %media_type,
        body_size_bytes = req.body().as_bytes().map_or(0, <[u8]>::len),
        param_count = parsed.params.len(),
        file_count = parsed.files.len(),
        "Request body parsed"
    );
    Ok(parsed)
}

async fn parse_multipart(bytes: Bytes, content_type: &str) -> Result<ParsedBody, Error> {
    let boundary = multer::parse_boundary(content_type)?;
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(bytes) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut parsed = ParsedBody::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match field.file_name().map(str::to_owned) {
            Some(filename) => {
                let content_type = field.content_type().map(ToString::to_string);
                let data = field.bytes().await?;
                parsed.files.insert(
                    name,
                    UploadedFile {
                        filename,
                        content_type,
                        data,
                    },
                );
            }
            None => {
                let text = field.text().await?;
                parsed.params.insert(name, Value::String(text));
            }
        }
    }
    Ok(parsed)
}
