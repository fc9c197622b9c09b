// src/backend/exams.rs

use log::info;
use reqwest::multipart::{Form, Part};
use std::time::Instant;

use crate::backend::{BackendClient, ensure_success};
use crate::download::filename_from_disposition;
use crate::errors::Result;
use crate::exam::{CreatedExam, FinalExam};
use crate::models::GenerationKind;
use crate::upload::PDF_MIME;

/// A document returned by the backend, with its suggested file name.
#[derive(Debug, Clone)]
pub struct DownloadedDocument {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl BackendClient {
    /// `POST /exam/create` with the PDFs as a multipart body.
    pub async fn create_exam(
        &self,
        token: &str,
        model: &str,
        kind: GenerationKind,
        files: Vec<(String, Vec<u8>)>,
    ) -> Result<CreatedExam> {
        info!(
            "Generating {} with model {} from {} file(s)",
            kind.as_str(),
            model,
            files.len()
        );

        let mut form = Form::new()
            .text("model", model.to_string())
            .text("type", kind.as_str());
        for (name, bytes) in files {
            let part = Part::bytes(bytes).file_name(name).mime_str(PDF_MIME)?;
            form = form.part("files", part);
        }

        let start = Instant::now();
        let resp = self
            .post("/exam/create")
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;
        let created: CreatedExam = resp.json().await?;

        info!(
            "Exam created with {} question(s) ({}ms)",
            created.questions.len(),
            start.elapsed().as_millis()
        );
        Ok(created)
    }

    /// `POST /exam/final`; the reply body is the rendered PDF.
    pub async fn finalize_exam(&self, token: &str, exam: &FinalExam) -> Result<DownloadedDocument> {
        info!("Submitting exam {} ({} questions)", exam.id, exam.questions.len());
        let resp = self
            .post("/exam/final")
            .bearer_auth(token)
            .json(exam)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        let filename = filename_from_disposition(
            resp.headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok()),
        );
        let bytes = resp.bytes().await?.to_vec();
        Ok(DownloadedDocument { filename, bytes })
    }
}
