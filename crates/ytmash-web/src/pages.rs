//! HTML pages for the mashup form UI
//!
//! Plain HTML/CSS rendered inline, no templates or frameworks.

use std::path::Path;

use ytmash_core::request::{MIN_CLIP_OFFSET_SECS, MIN_VIDEO_COUNT};

const STYLE: &str = r#"
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 520px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        label {
            display: block;
            margin: 15px 0 5px;
            font-weight: 600;
        }
        input {
            width: 100%;
            padding: 8px;
            border: 1px solid #ccc;
            border-radius: 4px;
            box-sizing: border-box;
        }
        small {
            color: #666;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            margin: 20px 0 10px;
            font-size: 1em;
            cursor: pointer;
        }
        .button:hover {
            background: #0052a3;
        }
        .error {
            background: #fdecea;
            border-left: 4px solid #c0392b;
            padding: 10px 15px;
            border-radius: 4px;
        }
        .notice {
            background: #fef9e7;
            border-left: 4px solid #b7950b;
            padding: 10px 15px;
            border-radius: 4px;
        }
        code {
            background: #f4f4f4;
            padding: 2px 5px;
            border-radius: 3px;
        }
"#;

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLE}    </style>
</head>
<body>
{body}
</body>
</html>"#
    )
}

/// Landing form. An optional validation message is shown above the fields
/// so a rejected submission lands back on a filled-out page.
pub fn form_page(error: Option<&str>) -> String {
    let banner = match error {
        Some(msg) => format!("    <p class=\"error\">{}</p>\n", escape_html(msg)),
        None => String::new(),
    };

    let body = format!(
        r#"    <h1>ytmash</h1>
    <p>Builds one audio mashup from a singer's YouTube videos and emails it to you.
    The request runs while the page loads, so expect a wait.</p>
{banner}    <form method="post" action="/mashup">
        <label for="singer_name">Singer Name</label>
        <input type="text" id="singer_name" name="singer_name" placeholder="e.g. Nina Simone" required>

        <label for="video_count">Number of Videos</label>
        <input type="number" id="video_count" name="video_count" min="{MIN_VIDEO_COUNT}" value="{MIN_VIDEO_COUNT}" required>
        <small>At least {MIN_VIDEO_COUNT}; clips are joined in search order.</small>

        <label for="clip_offset">Audio Duration</label>
        <input type="number" id="clip_offset" name="clip_offset" min="{MIN_CLIP_OFFSET_SECS}" value="{MIN_CLIP_OFFSET_SECS}" required>
        <small>Seconds dropped from the start of every video, at least {MIN_CLIP_OFFSET_SECS}.</small>

        <label for="email">Email Id</label>
        <input type="email" id="email" name="email" placeholder="you@example.com" required>

        <button type="submit" class="button">Build mashup</button>
    </form>"#
    );

    page("ytmash", &body)
}

/// Shown after the pipeline finished and the email went out.
pub fn success_page(singer: &str, recipient: &str) -> String {
    let body = format!(
        r#"    <h1>Mashup sent</h1>
    <p>Your <strong>{}</strong> mashup is on its way to <code>{}</code>.</p>
    <p><a href="/" class="button">Build another</a></p>"#,
        escape_html(singer),
        escape_html(recipient),
    );
    page("ytmash - sent", &body)
}

/// The mashup was built but the email did not go out. Names the retained
/// file so the run is not lost.
pub fn delivery_failed_page(error: &str, retained: &Path) -> String {
    let body = format!(
        r#"    <h1>Mashup built, email failed</h1>
    <p class="notice">{}</p>
    <p>The mashup itself finished and is kept on the server at
    <code>{}</code>.</p>
    <p><a href="/" class="button">Back to form</a></p>"#,
        escape_html(error),
        escape_html(&retained.display().to_string()),
    );
    page("ytmash - email failed", &body)
}

/// Pipeline failure. No mashup was produced.
pub fn failure_page(error: &str) -> String {
    let body = format!(
        r#"    <h1>Mashup failed</h1>
    <p class="error">{}</p>
    <p><a href="/" class="button">Back to form</a></p>"#,
        escape_html(error),
    );
    page("ytmash - failed", &body)
}

/// Minimal escaping for text interpolated into the pages. Video titles and
/// error messages carry arbitrary user input.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html(r#"<script>alert("x")</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("AC/DC & friends"), "AC/DC &amp; friends");
    }

    #[test]
    fn test_form_page_includes_inline_error() {
        let html = form_page(Some("number of videos must be greater than 10"));
        assert!(html.contains("greater than 10"));
        assert!(html.contains("name=\"singer_name\""));
    }

    #[test]
    fn test_form_page_without_error_has_no_banner() {
        assert!(!form_page(None).contains("class=\"error\""));
    }
}
