use std::fmt::{Display, Formatter};
use std::io::Write;
use std::str::FromStr;

use serde::Serialize;
use serde_json::{json, Value as Json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    /// Lowercase name, also used as the action prefix ("get", "post", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Patch => "patch",
            Method::Delete => "delete",
            Method::Head => "head",
            Method::Options => "options",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "patch" => Ok(Method::Patch),
            "delete" => Ok(Method::Delete),
            "head" => Ok(Method::Head),
            "options" => Ok(Method::Options),
            other => Err(format!("unsupported method '{other}'")),
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Percent-decode; text that does not decode to UTF-8 is kept as sent.
fn percent_decode(raw: &str) -> String {
    urlencoding::decode(raw).map(|c| c.into_owned()).unwrap_or_else(|_| raw.to_string())
}

/// Query string component: `+` is a space, then percent escapes.
fn form_decode(raw: &str) -> String { percent_decode(&raw.replace('+', " ")) }

/// Incoming request reduced to what routing and handlers need.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    segments: Vec<String>,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl Request {
    /// Build from a method and a request target such as `/users/show?id=1`.
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(percent_decode)
            .collect();
        let query = query
            .split('&')
            .filter(|s| !s.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (form_decode(k), form_decode(v)),
                None => (form_decode(pair), String::new()),
            })
            .collect();
        Self { method, segments, query, body: None }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn method(&self) -> Method { self.method }

    /// Non-empty path segments in order.
    pub fn segment_keys(&self) -> &[String] { &self.segments }

    pub fn segment(&self, index: usize) -> Option<&str> { self.segments.get(index).map(String::as_str) }

    /// First value of a query string parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn body(&self) -> Option<&str> { self.body.as_deref() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Created,
    NoContent,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
    ServiceUnavailable,
}

impl Status {
    pub fn code(&self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::Created => 201,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::NotFound => 404,
            Status::MethodNotAllowed => 405,
            Status::InternalServerError => 500,
            Status::ServiceUnavailable => 503,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Created => "Created",
            Status::NoContent => "No Content",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::MethodNotAllowed => "Method Not Allowed",
            Status::InternalServerError => "Internal Server Error",
            Status::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// Closest known status for a numeric code; unknown codes become 500.
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => Status::Ok,
            201 => Status::Created,
            204 => Status::NoContent,
            400 => Status::BadRequest,
            404 => Status::NotFound,
            405 => Status::MethodNotAllowed,
            503 => Status::ServiceUnavailable,
            _ => Status::InternalServerError,
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}

/// JSON response with a status line.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: Status,
    body: Json,
    debug: bool,
}

impl Default for Response {
    fn default() -> Self { Self { status: Status::Ok, body: Json::Null, debug: false } }
}

impl Response {
    pub fn new() -> Self { Self::default() }

    /// Include error details in 500 responses.
    pub fn enable_debug(&mut self) -> &mut Self {
        self.debug = true;
        self
    }

    pub fn is_debug(&self) -> bool { self.debug }

    pub fn set_body<T: Serialize + ?Sized>(&mut self, body: &T) -> Result<&mut Self, serde_json::Error> {
        self.body = serde_json::to_value(body)?;
        Ok(self)
    }

    pub fn set_status(&mut self, status: Status) -> &mut Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> Status { self.status }

    /// Status line without the protocol, e.g. "200 OK".
    pub fn get_status_code(&self) -> String { self.status.to_string() }

    /// Body as JSON text.
    pub fn get_body(&self) -> String { self.body.to_string() }

    pub fn body_json(&self) -> &Json { &self.body }

    pub fn not_found(&mut self) -> &mut Self {
        self.status = Status::NotFound;
        self.body = json!({"message": Status::NotFound.reason()});
        self
    }

    pub fn method_not_allowed(&mut self) -> &mut Self {
        self.status = Status::MethodNotAllowed;
        self.body = json!({"message": Status::MethodNotAllowed.reason()});
        self
    }

    /// Turn an error into a 500. In debug mode the body carries the message
    /// and the cause chain as `trace`.
    pub fn internal_server_error(&mut self, err: &anyhow::Error) -> &mut Self {
        self.error_with_status(Status::InternalServerError, err)
    }

    pub(crate) fn error_with_status(&mut self, status: Status, err: &anyhow::Error) -> &mut Self {
        self.status = status;
        self.body = if self.debug {
            let trace: Vec<String> = err.chain().map(|c| c.to_string()).collect();
            json!({"message": err.to_string(), "trace": trace})
        } else {
            json!({"message": status.reason()})
        };
        self
    }

    /// Serialize as an HTTP/1.1 response.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        let body = self.get_body();
        write!(out, "HTTP/1.1 {}\r\n", self.status)?;
        write!(out, "Content-Type: application/json\r\n")?;
        write!(out, "Content-Length: {}\r\n\r\n", body.len())?;
        out.write_all(body.as_bytes())?;
        out.flush()
    }
}
