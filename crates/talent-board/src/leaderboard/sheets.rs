use async_trait::async_trait;
use google_sheets4::api::Scope;
use google_sheets4::{hyper_rustls, hyper_util, yup_oauth2, Sheets};
use serde_json::Value;

use crate::config::SheetsConfig;

const TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// One tab of the source spreadsheet, in spreadsheet order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTab {
    pub index: usize,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("spreadsheet quota exhausted: {0}")]
    Throttled(String),
    #[error("spreadsheet access denied: {0}")]
    PermissionDenied(String),
    #[error("spreadsheet backend error: {0}")]
    Backend(String),
}

/// Read-only access to the spreadsheet backing the board. The production
/// implementation wraps the generated Sheets client; tests substitute fakes.
#[async_trait]
pub trait SheetsGateway: std::fmt::Debug + Send + Sync {
    async fn list_tabs(&self) -> Result<Vec<SheetTab>, SheetsError>;

    /// Returns every row of the tab, header row included, cells stringified.
    async fn read_rows(&self, tab: &SheetTab) -> Result<Vec<Vec<String>>, SheetsError>;
}

/// Thin wrapper around the generated google-sheets4 client scoped to a single
/// spreadsheet.
pub struct GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    spreadsheet_id: String,
}

impl<C> GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: Sheets<C>, spreadsheet_id: String) -> Self {
        Self {
            hub,
            spreadsheet_id,
        }
    }
}

impl GoogleSheetsClient<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>> {
    /// Builds an authenticated client from service-account credentials.
    pub async fn connect(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let key = yup_oauth2::ServiceAccountKey {
            key_type: Some("service_account".to_string()),
            project_id: None,
            private_key_id: None,
            private_key: config.private_key.clone(),
            client_email: config.service_account_email.clone(),
            client_id: None,
            auth_uri: None,
            token_uri: TOKEN_URI.to_string(),
            auth_provider_x509_cert_url: None,
            client_x509_cert_url: None,
        };

        let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
            .build()
            .await
            .map_err(|err| SheetsError::Backend(err.to_string()))?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|err| SheetsError::Backend(err.to_string()))?
            .https_or_http()
            .enable_http1()
            .build();
        let client =
            hyper_util::client::legacy::Client::builder(hyper_util::rt::TokioExecutor::new())
                .build(connector);

        Ok(Self::new(
            Sheets::new(client, auth),
            config.spreadsheet_id.clone(),
        ))
    }
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C> SheetsGateway for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    async fn list_tabs(&self) -> Result<Vec<SheetTab>, SheetsError> {
        let result = self
            .hub
            .spreadsheets()
            .get(&self.spreadsheet_id)
            .param("fields", "sheets(properties(index,title))")
            .add_scope(Scope::SpreadsheetReadonly)
            .doit()
            .await;

        let (_, spreadsheet) = result.map_err(classify_error)?;
        let sheets = spreadsheet.sheets.unwrap_or_default();

        Ok(sheets
            .into_iter()
            .enumerate()
            .map(|(position, sheet)| {
                let properties = sheet.properties.unwrap_or_default();
                SheetTab {
                    index: properties
                        .index
                        .and_then(|index| usize::try_from(index).ok())
                        .unwrap_or(position),
                    title: properties
                        .title
                        .unwrap_or_else(|| format!("Sheet{}", position + 1)),
                }
            })
            .collect())
    }

    async fn read_rows(&self, tab: &SheetTab) -> Result<Vec<Vec<String>>, SheetsError> {
        // Quoting the title keeps tabs with spaces or punctuation addressable.
        let range = format!("'{}'", tab.title.replace('\'', "''"));
        let result = self
            .hub
            .spreadsheets()
            .values_get(&self.spreadsheet_id, &range)
            .add_scope(Scope::SpreadsheetReadonly)
            .doit()
            .await;

        let (_, value_range) = result.map_err(classify_error)?;
        let values = value_range.values.unwrap_or_default();

        Ok(values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }
}

fn cell_to_string(cell: Value) -> String {
    match cell {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Maps the generated client's error onto the fetch taxonomy. Quota and
/// permission failures get their own variants so the caller can serve the
/// distinguished degraded state instead of a bare empty board.
fn classify_error(err: google_sheets4::Error) -> SheetsError {
    let status = match &err {
        google_sheets4::Error::Failure(response) => Some(response.status().as_u16()),
        google_sheets4::Error::BadRequest(value) => value
            .pointer("/error/code")
            .and_then(Value::as_u64)
            .and_then(|code| u16::try_from(code).ok()),
        _ => None,
    };

    let message = err.to_string();
    match status {
        Some(429) => SheetsError::Throttled(message),
        Some(403) => SheetsError::PermissionDenied(message),
        Some(_) => SheetsError::Backend(message),
        None if message.contains("429") || message.to_ascii_lowercase().contains("quota") => {
            SheetsError::Throttled(message)
        }
        None if message.contains("403") || message.to_ascii_lowercase().contains("permission") => {
            SheetsError::PermissionDenied(message)
        }
        None => SheetsError::Backend(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bad_request_codes_map_to_fetch_taxonomy() {
        let quota = google_sheets4::Error::BadRequest(json!({
            "error": { "code": 429, "message": "Quota exceeded" }
        }));
        assert!(matches!(classify_error(quota), SheetsError::Throttled(_)));

        let forbidden = google_sheets4::Error::BadRequest(json!({
            "error": { "code": 403, "message": "The caller does not have permission" }
        }));
        assert!(matches!(
            classify_error(forbidden),
            SheetsError::PermissionDenied(_)
        ));

        let other = google_sheets4::Error::BadRequest(json!({
            "error": { "code": 500, "message": "Internal error" }
        }));
        assert!(matches!(classify_error(other), SheetsError::Backend(_)));
    }

    #[test]
    fn cells_stringify_numbers_without_quotes() {
        assert_eq!(cell_to_string(json!("Ana")), "Ana");
        assert_eq!(cell_to_string(json!(70)), "70");
        assert_eq!(cell_to_string(json!(70.5)), "70.5");
        assert_eq!(cell_to_string(Value::Null), "");
    }
}
