use std::path::Path;

use api_types::{Id, import::Import};
use reqwest::{
    Method,
    multipart::{Form, Part},
};

use crate::{Client, ClientError, Result, segment};

fn mime_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => "text/csv",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        Some("xls") => "application/vnd.ms-excel",
        Some("pdf") => "application/pdf",
        Some("ofx") | Some("qfx") => "application/x-ofx",
        _ => "application/octet-stream",
    }
}

impl Client {
    pub async fn imports_list(&self) -> Result<Vec<Import>> {
        self.get("imports").await
    }

    pub async fn import_get(&self, id: &Id) -> Result<Import> {
        self.get(&format!("imports/{}", segment(id))).await
    }

    /// Uploads a bank statement to be imported into `account`.
    pub async fn import_upload(
        &self,
        account: &Id,
        file_name: &str,
        contents: Vec<u8>,
    ) -> Result<Import> {
        if contents.is_empty() {
            return Err(ClientError::InvalidRequest(format!("{file_name} is empty")));
        }
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str(mime_for(file_name))?;
        let form = Form::new()
            .text("account", account.to_string())
            .part("file", part);

        tracing::info!("uploading statement {file_name} for account {account}");
        let req = self.request(Method::POST, "imports")?.multipart(form);
        self.send::<api_types::Envelope<Import>>(req)
            .await
            .map(api_types::Envelope::into_data)
    }

    pub async fn import_delete(&self, id: &Id) -> Result<()> {
        self.delete(&format!("imports/{}", segment(id))).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_mime_from_extension() {
        assert_eq!(mime_for("june.CSV"), "text/csv");
        assert_eq!(mime_for("statement.pdf"), "application/pdf");
        assert_eq!(mime_for("noext"), "application/octet-stream");
    }
}
