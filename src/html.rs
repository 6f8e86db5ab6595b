// ABOUTME: HTML generation module for the code-walk application
// ABOUTME: Builds a standalone stepping deck from walkthroughs with embedded resources

use crate::errors::Result;
use crate::resources::{ResourceFile, ResourceKind};
use crate::script::Walkthrough;
use crate::stepper::StepView;
use crate::utils;
use comrak::{markdown_to_html, ComrakOptions};
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Configuration for HTML deck generation
#[derive(Debug, Clone)]
pub struct HtmlConfig {
    pub title: String,
    pub css_files: Vec<ResourceFile>,
    pub js_files: Vec<ResourceFile>,
    pub embed_resources: bool,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            title: "Code Walkthrough".to_string(),
            css_files: Vec::new(),
            js_files: Vec::new(),
            embed_resources: true,
        }
    }
}

const BASE_STYLE: &str = "<style>
.step { display: none; }
.step.active { display: block; }
.step pre mark { display: block; min-height: 1.2em; }
.code-title { font-size: 1.6em; font-weight: bold; }
</style>";

// Shows one step at a time; arrow keys and space move through all steps in order, clamped at both ends.
const NAV_SCRIPT: &str = "<script>
(function () {
  var steps = document.querySelectorAll('.step');
  var current = 0;
  function show(i) {
    if (i < 0 || i >= steps.length) { return; }
    steps[current].classList.remove('active');
    current = i;
    steps[current].classList.add('active');
  }
  if (steps.length > 0) { steps[0].classList.add('active'); }
  document.addEventListener('keydown', function (e) {
    if (e.key === 'ArrowRight' || e.key === 'ArrowDown' || e.key === ' ') { show(current + 1); }
    if (e.key === 'ArrowLeft' || e.key === 'ArrowUp') { show(current - 1); }
  });
})();
</script>";

/// Generate a full HTML deck for the given walkthroughs
pub fn generate_html(walkthroughs: &[Walkthrough], config: &HtmlConfig) -> Result<String> {
    info!("Generating HTML deck from {} walkthroughs", walkthroughs.len());

    let mut html_doc = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html_doc.push_str("<meta charset=\"UTF-8\">\n");
    html_doc.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html_doc.push_str(&format!("<title>{}</title>\n", escape_html(&config.title)));
    html_doc.push_str(BASE_STYLE);
    html_doc.push('\n');

    for css in &config.css_files {
        match css.tag(ResourceKind::Css, config.embed_resources) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                // Continue with other resources rather than failing completely
                warn!("Failed to include CSS resource {}: {}", css.path, e);
            }
        }
    }

    html_doc.push_str("</head>\n<body>\n");

    for walkthrough in walkthroughs {
        html_doc.push_str(&render_walkthrough(walkthrough));
    }

    html_doc.push_str(NAV_SCRIPT);
    html_doc.push('\n');

    for js in &config.js_files {
        match js.tag(ResourceKind::Js, config.embed_resources) {
            Ok(tag) => {
                html_doc.push_str(&tag);
                html_doc.push('\n');
            }
            Err(e) => {
                warn!("Failed to include JavaScript resource {}: {}", js.path, e);
            }
        }
    }

    html_doc.push_str("</body>\n</html>");

    Ok(html_doc)
}

fn render_walkthrough(walkthrough: &Walkthrough) -> String {
    let lang = walkthrough.lang.as_deref().unwrap_or("text");
    let stepper = &walkthrough.stepper;

    let mut section = format!(
        "<section class=\"walkthrough\" data-lang=\"{}\" data-title=\"{}\">\n",
        escape_html(lang),
        escape_html(&walkthrough.title)
    );

    for view in (0..stepper.len()).filter_map(|i| stepper.view(i)) {
        section.push_str(&render_step(stepper.source().lines(), &view, lang));
    }

    section.push_str("</section>\n");
    section
}

fn render_step(lines: &[String], view: &StepView<'_>, lang: &str) -> String {
    // The opening step titles the walkthrough, later ones annotate it
    let label_class = if view.index == 0 {
        "code-title"
    } else {
        "code-note"
    };

    let mut step = format!(
        "<div class=\"step\" data-step=\"{}\" data-start=\"{}\" data-end=\"{}\">\n",
        view.index + 1,
        view.start_line,
        view.end_line
    );
    step.push_str(&format!(
        "<div class=\"{}\">{}</div>\n",
        label_class,
        render_label(view.label)
    ));

    step.push_str(&format!(
        "<pre><code class=\"language-{}\">",
        escape_html(lang)
    ));
    for (number, line) in lines.iter().enumerate() {
        let escaped = escape_html(line);
        if number >= view.start_line && number < view.end_line {
            step.push_str(&format!("<mark>{}</mark>", escaped));
        } else {
            step.push_str(&escaped);
            step.push('\n');
        }
    }
    step.push_str("</code></pre>\n</div>\n");
    step
}

/// Render a label's inline markdown, dropping the paragraph wrapper comrak adds
fn render_label(label: &str) -> String {
    let options = ComrakOptions::default();
    let html = markdown_to_html(label, &options);
    let trimmed = html.trim();
    trimmed
        .strip_prefix("<p>")
        .and_then(|s| s.strip_suffix("</p>"))
        .unwrap_or(trimmed)
        .to_string()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Utility function to write HTML content to a file
pub fn write_html_to_file(html_content: &str, output_path: &Path) -> Result<()> {
    info!("Writing HTML to file: {:?}", output_path);

    utils::ensure_parent_directory_exists(output_path)?;
    fs::write(output_path, html_content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{parse_script, Walkthrough};
    use crate::source::SourceText;
    use tempfile::TempDir;

    fn blink_walkthrough() -> Walkthrough {
        let script = parse_script(
            "% Native Blink Sketch\n% c\n% arduino.example\n\
             # 0..4 Native Blink Sketch\n\
             # 0..1\nReplaces `LED_PIN` with `13`.\n\
             # 2..4\nThe setup function runs *once*\n",
        )
        .unwrap();
        let source = SourceText::from_text(
            "#define LED_PIN 13\n\nvoid setup() {\n  pinMode(LED_PIN, OUTPUT);\n",
        );
        Walkthrough::with_source(script, ResourceFile::new("arduino.example"), source).unwrap()
    }

    #[test]
    fn test_deck_structure() {
        let html = generate_html(&[blink_walkthrough()], &HtmlConfig::default()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Code Walkthrough</title>"));
        assert!(html.contains(
            "<section class=\"walkthrough\" data-lang=\"c\" data-title=\"Native Blink Sketch\">"
        ));
        assert_eq!(html.matches("<div class=\"step\"").count(), 3);
        assert!(html.contains("data-step=\"3\" data-start=\"2\" data-end=\"4\""));
        assert!(html.ends_with("</html>"));
    }

    #[test]
    fn test_title_and_note_classes() {
        let html = generate_html(&[blink_walkthrough()], &HtmlConfig::default()).unwrap();
        assert!(html.contains("<div class=\"code-title\">Native Blink Sketch</div>"));
        assert!(html.contains(
            "<div class=\"code-note\">Replaces <code>LED_PIN</code> with <code>13</code>.</div>"
        ));
        assert!(html.contains("<div class=\"code-note\">The setup function runs <em>once</em></div>"));
    }

    #[test]
    fn test_highlight_and_escaping() {
        let html = generate_html(&[blink_walkthrough()], &HtmlConfig::default()).unwrap();
        assert!(html.contains("<mark>#define LED_PIN 13</mark>"));
        assert!(html.contains("<mark>  pinMode(LED_PIN, OUTPUT);</mark>"));

        let script = parse_script("% a.cpp\n# 0..1 Compare\n").unwrap();
        let walkthrough = Walkthrough::with_source(
            script,
            ResourceFile::new("a.cpp"),
            SourceText::from_text("if (a < b && c > \"d\") {}"),
        )
        .unwrap();
        let html = generate_html(&[walkthrough], &HtmlConfig::default()).unwrap();
        assert!(html.contains("<mark>if (a &lt; b &amp;&amp; c &gt; &quot;d&quot;) {}</mark>"));
        assert!(html.contains("class=\"language-text\""));
    }

    #[test]
    fn test_blank_highlighted_line_keeps_height() {
        let html = generate_html(&[blink_walkthrough()], &HtmlConfig::default()).unwrap();
        // The opening step spans the blank second line of the sketch
        assert!(html.contains("<mark>#define LED_PIN 13</mark><mark></mark><mark>void setup() {</mark>"));
        assert!(html.contains(".step pre mark { display: block; min-height: 1.2em; }"));
    }

    #[test]
    fn test_linked_and_missing_resources() {
        let config = HtmlConfig {
            css_files: vec![
                ResourceFile::new("https://example.com/monokai.css"),
                ResourceFile::new("/missing/theme.css"),
            ],
            js_files: vec![ResourceFile::new("deck.js")],
            embed_resources: false,
            ..HtmlConfig::default()
        };
        let html = generate_html(&[blink_walkthrough()], &config).unwrap();
        assert!(html.contains(r#"<link rel="stylesheet" href="https://example.com/monokai.css">"#));
        assert!(html.contains(r#"<link rel="stylesheet" href="/missing/theme.css">"#));
        assert!(html.contains(r#"<script src="deck.js"></script>"#));

        // Embedding a missing local file is skipped rather than fatal
        let config = HtmlConfig {
            css_files: vec![ResourceFile::new("/missing/theme.css")],
            ..HtmlConfig::default()
        };
        let html = generate_html(&[blink_walkthrough()], &config).unwrap();
        assert!(!html.contains("theme.css"));
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let output = dir.path().join("out/deck/index.html");
        write_html_to_file("<html></html>", &output).unwrap();
        assert_eq!(fs::read_to_string(output).unwrap(), "<html></html>");
    }
}
