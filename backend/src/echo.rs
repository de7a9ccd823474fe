use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Static upload form served on `GET /get-img-data`.
pub const UPLOAD_FORM_HTML: &str = "\
<html>
<body>
<h1>Upload an Image</h1>
<form action=\"/get-img-data\" method=\"post\" enctype=\"multipart/form-data\">
  <input type=\"file\" name=\"file\" accept=\"image/*\" required />
  <button type=\"submit\">Upload</button>
</form>
</body>
</html>
";

/// Embed the uploaded bytes in an HTML page as a base64 data URI.
///
/// The media type is always declared as `image/png` and the bytes are never
/// validated; non-image input renders as a broken image in the browser.
pub fn render_echo_page(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    format!(
        "\
<html>
<body>
<h1>Uploaded Image</h1>
<img src=\"data:image/png;base64,{}\" alt=\"Uploaded Image\" />
</body>
</html>
",
        encoded
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_page_round_trips_the_bytes() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let page = render_echo_page(&bytes);

        let start = page.find("base64,").expect("data URI marker") + "base64,".len();
        let end = page[start..].find('"').expect("closing quote") + start;
        let decoded = STANDARD.decode(&page[start..end]).expect("valid base64");

        assert_eq!(decoded, bytes);
    }

    #[test]
    fn echo_page_declares_png_regardless_of_input() {
        let page = render_echo_page(b"definitely not a png");
        assert!(page.contains("data:image/png;base64,"));
    }

    #[test]
    fn upload_form_posts_back_to_the_same_route() {
        assert!(UPLOAD_FORM_HTML.contains("action=\"/get-img-data\""));
        assert!(UPLOAD_FORM_HTML.contains("method=\"post\""));
        assert!(UPLOAD_FORM_HTML.contains("name=\"file\""));
        assert!(UPLOAD_FORM_HTML.contains("enctype=\"multipart/form-data\""));
    }
}
