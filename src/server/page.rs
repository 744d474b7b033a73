//! 单页界面的HTML渲染

use crate::generator::workflow::BlogReport;

const STYLE: &str = r#"
body { margin: 0; font-family: -apple-system, "Segoe UI", Roboto, sans-serif; display: flex; min-height: 100vh; color: #262730; }
aside { width: 300px; padding: 24px; background: #f0f2f6; box-sizing: border-box; }
main { flex: 1; padding: 32px 48px; max-width: 860px; }
.sidebar-content { background-color: black; color: white; padding: 10px; border-radius: 10px; margin-bottom: 24px; }
label { display: block; margin: 12px 0 4px; font-size: 14px; }
input[type=text], input[type=password] { width: 100%; padding: 8px; box-sizing: border-box; border: 1px solid #ccc; border-radius: 6px; }
button { margin-top: 16px; padding: 8px 16px; border-radius: 6px; border: 1px solid #ccc; background: white; cursor: pointer; }
.error { margin-top: 16px; padding: 12px; border-radius: 6px; background: #ffe4e4; color: #7d1a1a; }
.spinner { display: none; margin-top: 16px; color: #555; }
.download { display: inline-block; margin-top: 24px; padding: 8px 16px; border: 1px solid #ccc; border-radius: 6px; text-decoration: none; color: inherit; }
details { margin-top: 24px; }
"#;

const ABOUT: &str = "This AI-powered application helps generate complete blog drafts on any technical or non-technical topic. It simplifies the blogging process by researching, writing, and refining the blog for you. Great for marketers, educators, or content creators looking for structured and engaging writeups.";

/// 表单回填的值
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    pub api_key: String,
    pub serper_api_key: String,
    pub model: String,
    pub topic: String,
}

impl FormValues {
    /// 清空API KEY，避免在响应中回传
    pub fn without_secrets(&self) -> Self {
        Self {
            api_key: String::new(),
            serper_api_key: String::new(),
            ..self.clone()
        }
    }
}

/// 页面状态
#[derive(Debug, Default)]
pub enum PageBody<'a> {
    #[default]
    Empty,
    Error(String),
    Result(&'a BlogReport),
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn render_result(report: &BlogReport) -> String {
    let mut html = String::from("<h2>Generated Blog Post</h2>\n<article>");
    html.push_str(&markdown::to_html(&report.draft.post));
    html.push_str("</article>\n");

    html.push_str(&format!(
        "<a class=\"download\" download=\"{}\" href=\"{}\">\u{1F4C4} Download Blog as Word Document</a>\n",
        escape_html(&report.document.file_name),
        report.document.data_uri()
    ));

    if !report.draft.review.trim().is_empty() {
        html.push_str("<details><summary>Editor review</summary>");
        html.push_str(&markdown::to_html(&report.draft.review));
        html.push_str("</details>\n");
    }

    html
}

/// 渲染完整页面
pub fn render_page(values: &FormValues, body: &PageBody<'_>) -> String {
    let content = match body {
        PageBody::Empty => String::new(),
        PageBody::Error(message) => {
            format!("<div class=\"error\">{}</div>", escape_html(message))
        }
        PageBody::Result(report) => render_result(report),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>AI Blog Writer</title>
<style>{style}</style>
</head>
<body>
<form method="post" action="/generate" onsubmit="document.getElementById('spinner').style.display='block'" style="display: contents">
<aside>
<div class="sidebar-content"><h2>About:</h2><p>{about}</p></div>
<h1>Configuration</h1>
<label for="api_key">Enter Groq Cloud API Key:</label>
<input type="password" id="api_key" name="api_key" value="{api_key}" autocomplete="off">
<label for="serper_api_key">Enter serper_API key:</label>
<input type="password" id="serper_api_key" name="serper_api_key" value="{serper_api_key}" autocomplete="off">
<label for="model">Give model:</label>
<input type="password" id="model" name="model" value="{model}" autocomplete="off">
</aside>
<main>
<h1>AI Blog Writer</h1>
<label for="topic">Enter the blog topic:</label>
<input type="text" id="topic" name="topic" value="{topic}">
<button type="submit">Generate Blog Post</button>
<div id="spinner" class="spinner">Generating your blog post...</div>
{content}
</main>
</form>
</body>
</html>
"#,
        style = STYLE,
        about = ABOUT,
        api_key = escape_html(&values.api_key),
        serper_api_key = escape_html(&values.serper_api_key),
        model = escape_html(&values.model),
        topic = escape_html(&values.topic),
        content = content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_empty_page_has_masked_fields() {
        let html = render_page(&FormValues::default(), &PageBody::Empty);

        assert_eq!(html.matches("type=\"password\"").count(), 3);
        assert!(html.contains("Generate Blog Post"));
        assert!(html.contains("About:"));
        assert!(!html.contains("class=\"error\""));
    }

    #[test]
    fn test_error_page_escapes_values() {
        let values = FormValues {
            topic: "<script>alert(1)</script>".to_string(),
            ..Default::default()
        };
        let html = render_page(
            &values,
            &PageBody::Error("Please enter both the API key and topic.".to_string()),
        );

        assert!(html.contains("<div class=\"error\">Please enter both the API key and topic.</div>"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_without_secrets_keeps_model_and_topic() {
        let values = FormValues {
            api_key: "gsk_secret".to_string(),
            serper_api_key: "serper_secret".to_string(),
            model: "groq/gemma2-9b-it".to_string(),
            topic: "Rust".to_string(),
        }
        .without_secrets();

        let html = render_page(&values, &PageBody::Empty);

        assert!(!html.contains("gsk_secret"));
        assert!(!html.contains("serper_secret"));
        assert!(html.contains("value=\"groq/gemma2-9b-it\""));
        assert!(html.contains("value=\"Rust\""));
    }
}
