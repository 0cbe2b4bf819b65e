//! Google Sheets v4 backend.
//!
//! Authenticates with a service-account key file: signs an RS256 JWT
//! assertion and exchanges it at the key's `token_uri` for an access token.
//! Only the first worksheet of a spreadsheet is used.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::error::SheetError;
use crate::source_id::{is_placeholder, spreadsheet_id};
use crate::traits::{scan_grid, CellRef, CellUpdate, SheetBackend, SheetRows, TableSource};

const SCOPES: &str =
    "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com/v4";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const ASSERTION_TTL_SECS: u64 = 3600;
/// Refresh the cached token this long before it expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Configuration for the Google Sheets backend.
#[derive(Debug, Clone)]
pub struct GoogleSheetsConfig {
    /// Path to the service-account key file.
    pub credentials_path: PathBuf,
    /// HTTP request timeout.
    pub timeout: Duration,
    /// Sheets API base URL.
    pub api_base: String,
}

impl Default for GoogleSheetsConfig {
    fn default() -> Self {
        Self {
            credentials_path: PathBuf::from("service_account.json"),
            timeout: Duration::from_secs(30),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

/// Fields we need from a service-account key file.
#[derive(Debug, Clone, Deserialize)]
struct ServiceAccountKey {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: u64,
    exp: u64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    ASSERTION_TTL_SECS
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// State shared by the backend and every sheet it opens.
struct Inner {
    config: GoogleSheetsConfig,
    http: OnceLock<Client>,
    token: Mutex<Option<CachedToken>>,
}

impl Inner {
    /// The blocking client is built on first use so that it is created on a
    /// blocking thread, never on the async runtime.
    fn client(&self) -> Result<&Client, SheetError> {
        if let Some(client) = self.http.get() {
            return Ok(client);
        }
        let client = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| SheetError::Transport(format!("http client: {}", e)))?;
        let _ = self.http.set(client);
        self.http
            .get()
            .ok_or_else(|| SheetError::Transport("http client unavailable".into()))
    }

    fn load_key(&self) -> Result<ServiceAccountKey, SheetError> {
        let path = &self.config.credentials_path;
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SheetError::CredentialsMissing(path.display().to_string())
            } else {
                SheetError::Auth(format!("read {}: {}", path.display(), e))
            }
        })?;
        serde_json::from_str(&content)
            .map_err(|e| SheetError::Auth(format!("parse {}: {}", path.display(), e)))
    }

    fn access_token(&self) -> Result<String, SheetError> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| SheetError::Auth("token cache lock poisoned".into()))?;
        if let Some(token) = cached.as_ref() {
            if Instant::now() + TOKEN_REFRESH_MARGIN < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let key = self.load_key()?;
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| SheetError::Auth(e.to_string()))?
            .as_secs();
        let claims = AssertionClaims {
            iss: &key.client_email,
            scope: SCOPES,
            aud: &key.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| SheetError::Auth(format!("invalid private key: {}", e)))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| SheetError::Auth(format!("sign assertion: {}", e)))?;

        debug!("exchanging service-account assertion at {}", key.token_uri);
        let resp = self
            .client()?
            .post(&key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .map_err(|e| SheetError::Transport(format!("token exchange failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(SheetError::Auth(format!(
                "token exchange returned {}: {}",
                status, body
            )));
        }
        let token: TokenResponse = resp
            .json()
            .map_err(|e| SheetError::Malformed(format!("token response: {}", e)))?;

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(token.access_token)
    }

    /// `{api_base}/spreadsheets/{segments...}` with each segment percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, SheetError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| SheetError::InvalidSource(format!("api base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::InvalidSource("api base cannot be a base url".into()))?
            .pop_if_empty()
            .push("spreadsheets")
            .extend(segments);
        Ok(url)
    }

    fn send_json(&self, request: RequestBuilder) -> Result<serde_json::Value, SheetError> {
        let token = self.access_token()?;
        let resp = request
            .bearer_auth(token)
            .send()
            .map_err(|e| SheetError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(match status {
                StatusCode::NOT_FOUND => SheetError::NotFound(body),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    SheetError::Auth(format!("{}: {}", status, body))
                }
                _ => SheetError::Transport(format!("{}: {}", status, body)),
            });
        }
        resp.json()
            .map_err(|e| SheetError::Malformed(e.to_string()))
    }

    fn first_sheet_title(&self, spreadsheet_id: &str) -> Result<String, SheetError> {
        let mut url = self.url(&[spreadsheet_id])?;
        url.query_pairs_mut()
            .append_pair("fields", "sheets.properties.title");
        let body = self.send_json(self.client()?.get(url))?;
        body["sheets"][0]["properties"]["title"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| SheetError::NotFound(format!("{} has no worksheets", spreadsheet_id)))
    }
}

impl Drop for Inner {
    // The blocking client panics when dropped inside an async context, and
    // the last handle may go away on a runtime thread at shutdown.
    fn drop(&mut self) {
        if let Some(client) = self.http.take() {
            std::thread::spawn(move || drop(client));
        }
    }
}

/// GoogleSheetsBackend opens spreadsheets through the Sheets v4 REST API.
pub struct GoogleSheetsBackend {
    inner: Arc<Inner>,
}

impl GoogleSheetsBackend {
    pub fn new(config: GoogleSheetsConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                http: OnceLock::new(),
                token: Mutex::new(None),
            }),
        }
    }
}

impl SheetBackend for GoogleSheetsBackend {
    fn kind(&self) -> &'static str {
        "google"
    }

    fn open(&self, source_id: &str) -> Result<Arc<dyn TableSource>, SheetError> {
        if is_placeholder(source_id) {
            return Err(SheetError::InvalidSource(source_id.trim().to_string()));
        }
        // Missing credentials win over an unparseable source, and are
        // reported before any network traffic.
        if !self.inner.config.credentials_path.exists() {
            return Err(SheetError::CredentialsMissing(
                self.inner.config.credentials_path.display().to_string(),
            ));
        }
        let spreadsheet_id = spreadsheet_id(source_id)?;
        let title = self.inner.first_sheet_title(&spreadsheet_id)?;
        debug!("opened spreadsheet {} worksheet '{}'", spreadsheet_id, title);
        Ok(Arc::new(GoogleSheet {
            inner: Arc::clone(&self.inner),
            spreadsheet_id,
            title,
        }))
    }
}

/// The first worksheet of one spreadsheet.
pub struct GoogleSheet {
    inner: Arc<Inner>,
    spreadsheet_id: String,
    title: String,
}

impl GoogleSheet {
    fn range(&self, a1: Option<&str>) -> String {
        let quoted = format!("'{}'", self.title.replace('\'', "''"));
        match a1 {
            Some(a1) => format!("{}!{}", quoted, a1),
            None => quoted,
        }
    }

    fn values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let url = self.inner.url(&[&self.spreadsheet_id, "values", range])?;
        let body = self.inner.send_json(self.inner.client()?.get(url))?;
        parse_values(&body)
    }
}

impl TableSource for GoogleSheet {
    fn read_records(&self) -> Result<SheetRows, SheetError> {
        let grid = self.values(&self.range(None))?;
        Ok(SheetRows::from_grid(&grid))
    }

    fn find_cells(&self, value: &str) -> Result<Vec<CellRef>, SheetError> {
        let grid = self.values(&self.range(None))?;
        Ok(scan_grid(&grid, value))
    }

    fn header_row(&self) -> Result<Vec<String>, SheetError> {
        let grid = self.values(&self.range(Some("1:1")))?;
        Ok(grid.into_iter().next().unwrap_or_default())
    }

    fn update_cell(&self, cell: CellRef, value: &str) -> Result<(), SheetError> {
        self.update_cells(&[CellUpdate {
            cell,
            value: value.to_string(),
        }])
    }

    fn update_cells(&self, updates: &[CellUpdate]) -> Result<(), SheetError> {
        if updates.is_empty() {
            return Ok(());
        }
        let data = updates
            .iter()
            .map(|u| {
                Ok(json!({
                    "range": self.range(Some(&a1_notation(u.cell)?)),
                    "majorDimension": "ROWS",
                    "values": [[u.value]],
                }))
            })
            .collect::<Result<Vec<_>, SheetError>>()?;

        let url = self
            .inner
            .url(&[&self.spreadsheet_id, "values:batchUpdate"])?;

        let body = json!({
            "valueInputOption": "RAW",
            "data": data,
        });
        debug!(
            "batch update of {} cells in {}",
            updates.len(),
            self.spreadsheet_id
        );
        self.inner
            .send_json(self.inner.client()?.post(url).json(&body))?;
        Ok(())
    }
}

/// Convert a 1-based cell to A1 notation (`CellRef::new(2, 28)` → `AB2`).
fn a1_notation(cell: CellRef) -> Result<String, SheetError> {
    if cell.row == 0 || cell.col == 0 {
        return Err(SheetError::InvalidSource(format!(
            "cell coordinates are 1-based, got ({}, {})",
            cell.row, cell.col
        )));
    }
    let mut letters = Vec::new();
    let mut n = cell.col;
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    let column: String = letters.into_iter().rev().collect();
    Ok(format!("{}{}", column, cell.row))
}

/// Parse a `ValueRange` response into a string grid. Non-string cells
/// (numbers, booleans) are rendered with their JSON text.
fn parse_values(body: &serde_json::Value) -> Result<Vec<Vec<String>>, SheetError> {
    let Some(rows) = body.get("values") else {
        // The API omits `values` entirely for an empty range.
        return Ok(Vec::new());
    };
    let rows = rows
        .as_array()
        .ok_or_else(|| SheetError::Malformed("`values` is not an array".into()))?;
    rows.iter()
        .map(|row| {
            let cells = row
                .as_array()
                .ok_or_else(|| SheetError::Malformed("row is not an array".into()))?;
            Ok(cells
                .iter()
                .map(|cell| match cell {
                    serde_json::Value::String(s) => s.clone(),
                    serde_json::Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_columns() {
        assert_eq!(a1_notation(CellRef::new(1, 1)).unwrap(), "A1");
        assert_eq!(a1_notation(CellRef::new(7, 26)).unwrap(), "Z7");
        assert_eq!(a1_notation(CellRef::new(2, 27)).unwrap(), "AA2");
        assert_eq!(a1_notation(CellRef::new(2, 28)).unwrap(), "AB2");
        assert_eq!(a1_notation(CellRef::new(3, 703)).unwrap(), "AAA3");
        assert!(a1_notation(CellRef::new(0, 1)).is_err());
    }

    #[test]
    fn parse_values_grid() {
        let body = json!({
            "range": "'Leads'!A1:C3",
            "values": [["First Name", "Direct Phone Number"], ["Alex", 5550101, null]],
        });
        let grid = parse_values(&body).unwrap();
        assert_eq!(grid[0], vec!["First Name", "Direct Phone Number"]);
        assert_eq!(grid[1], vec!["Alex", "5550101", ""]);
    }

    #[test]
    fn parse_values_empty_range() {
        let body = json!({ "range": "'Leads'!A1:Z1000" });
        assert!(parse_values(&body).unwrap().is_empty());
    }

    #[test]
    fn parse_values_rejects_garbage() {
        assert!(matches!(
            parse_values(&json!({ "values": "nope" })),
            Err(SheetError::Malformed(_))
        ));
    }

    #[test]
    fn url_segments_are_escaped() {
        let inner = Inner {
            config: GoogleSheetsConfig::default(),
            http: OnceLock::new(),
            token: Mutex::new(None),
        };
        let url = inner.url(&["abc", "values", "'Q1 Leads'!1:1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/'Q1%20Leads'!1:1"
        );
    }

    #[test]
    fn open_without_key_file_reports_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let backend = GoogleSheetsBackend::new(GoogleSheetsConfig {
            credentials_path: dir.path().join("service_account.json"),
            ..Default::default()
        });
        let result = backend.open("https://docs.google.com/spreadsheets/d/abc123/edit");
        assert!(matches!(result, Err(SheetError::CredentialsMissing(_))));
    }

    #[test]
    fn open_checks_credentials_before_parsing_the_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = GoogleSheetsBackend::new(GoogleSheetsConfig {
            credentials_path: dir.path().join("service_account.json"),
            ..Default::default()
        });
        assert!(matches!(
            missing.open("https://example.com/not-a-sheet"),
            Err(SheetError::CredentialsMissing(_))
        ));

        let path = dir.path().join("present.json");
        std::fs::write(&path, "{}").unwrap();
        let present = GoogleSheetsBackend::new(GoogleSheetsConfig {
            credentials_path: path,
            ..Default::default()
        });
        assert!(matches!(
            present.open("https://example.com/not-a-sheet"),
            Err(SheetError::InvalidSource(_))
        ));
    }

    #[test]
    fn open_placeholder_is_invalid_source() {
        let backend = GoogleSheetsBackend::new(GoogleSheetsConfig::default());
        assert!(matches!(
            backend.open("ENTER_YOUR_SHEET_URL"),
            Err(SheetError::InvalidSource(_))
        ));
    }

    #[tokio::test]
    async fn client_drops_safely_on_the_runtime() {
        let inner = tokio::task::spawn_blocking(|| {
            let inner = Inner {
                config: GoogleSheetsConfig::default(),
                http: OnceLock::new(),
                token: Mutex::new(None),
            };
            inner.client().unwrap();
            inner
        })
        .await
        .unwrap();
        assert!(inner.http.get().is_some());
        drop(inner);
    }

    #[test]
    fn malformed_key_file_is_auth_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("service_account.json");
        std::fs::write(&path, "{ not json").unwrap();
        let inner = Inner {
            config: GoogleSheetsConfig {
                credentials_path: path,
                ..Default::default()
            },
            http: OnceLock::new(),
            token: Mutex::new(None),
        };
        assert!(matches!(inner.load_key(), Err(SheetError::Auth(_))));
    }
}
