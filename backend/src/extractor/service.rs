use image::{DynamicImage, ImageFormat};
use log::info;
use shared::ReceiptFields;
use std::io::Cursor;
use std::sync::Arc;

use super::provider::VisionProvider;
use super::questions;
use super::ExtractError;

/// Runs the fixed question set against one uploaded image. All-or-nothing:
/// any decode or model failure discards every answer collected so far.
#[derive(Clone)]
pub struct ReceiptExtractor {
    provider: Arc<dyn VisionProvider>,
}

impl ReceiptExtractor {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub async fn extract(&self, bytes: &[u8]) -> Result<ReceiptFields, ExtractError> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| ExtractError::Decode(e.to_string()))?;

        // Normalize to 3-channel RGB and re-encode as PNG for transport.
        let normalized = DynamicImage::ImageRgb8(decoded.to_rgb8());
        let mut png = Vec::new();
        normalized.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        // One call per question, strictly in table order; each call gates
        // the next.
        let merchant = self.ask_trimmed(questions::MERCHANT_QUESTION, &png).await?;
        let total = self.ask_trimmed(questions::TOTAL_QUESTION, &png).await?;
        let date = self.ask_trimmed(questions::DATE_QUESTION, &png).await?;

        info!("Extracted all {} receipt fields", questions::QUESTIONS.len());

        Ok(ReceiptFields {
            merchant,
            total,
            date,
        })
    }

    async fn ask_trimmed(&self, question: &str, png: &[u8]) -> Result<String, ExtractError> {
        let answer = self.provider.ask(question, png).await?;
        Ok(answer.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::provider::ScriptedProvider;
    use image::RgbImage;

    fn tiny_image(format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, image::Rgb([220, 210, 190])));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
        buf
    }

    #[actix_web::test]
    async fn extracts_three_trimmed_fields_from_a_jpeg() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("  Walmart  "),
            Ok("$23.45"),
            Ok("2024-01-15\n"),
        ]));
        let extractor = ReceiptExtractor::new(provider.clone());

        let fields = extractor
            .extract(&tiny_image(ImageFormat::Jpeg))
            .await
            .unwrap();

        assert_eq!(
            fields,
            ReceiptFields {
                merchant: "Walmart".to_string(),
                total: "$23.45".to_string(),
                date: "2024-01-15".to_string(),
            }
        );

        // Questions went out in the fixed order.
        let seen = provider.questions_seen.lock().unwrap().clone();
        let expected: Vec<String> = questions::QUESTIONS
            .iter()
            .map(|(_, q)| q.to_string())
            .collect();
        assert_eq!(seen, expected);
    }

    #[actix_web::test]
    async fn non_image_bytes_fail_before_any_model_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok("never used")]));
        let extractor = ReceiptExtractor::new(provider.clone());

        let err = extractor.extract(b"not an image").await.unwrap_err();

        assert!(matches!(err, ExtractError::Decode(_)));
        assert_eq!(provider.calls_made(), 0);
    }

    #[actix_web::test]
    async fn failure_on_the_second_call_discards_the_first_answer() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("Walmart"),
            Err("service unavailable"),
        ]));
        let extractor = ReceiptExtractor::new(provider.clone());

        let err = extractor
            .extract(&tiny_image(ImageFormat::Png))
            .await
            .unwrap_err();

        assert!(matches!(err, ExtractError::Api { status: 503, .. }));
        // The third question was never issued.
        assert_eq!(provider.calls_made(), 2);
    }
}
