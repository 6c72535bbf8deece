use std::fmt::Write;

use ns_core::{ScoredArticle, SentimentLabel, Topic};
use ns_session::{DashboardView, Notice};

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1100px; padding: 20px; }
.banner { background-color: #f5f5f5; padding: 15px; border-radius: 10px; text-align: center; }
.banner h1 { color: #000000; }
.controls { display: flex; gap: 12px; align-items: end; margin-bottom: 20px; }
.card { background-color: #e0e0e0; padding: 20px; border-radius: 10px; margin-bottom: 20px; box-shadow: 0 4px 8px rgba(0, 0, 0, 0.1); }
.card h2 { color: #000000; }
.card h2 a { color: inherit; text-decoration: none; }
.meta { color: #555555; }
.text { color: #000000; font-size: 16px; }
.positive { color: #1b5e20; }
.negative { color: #b71c1c; }
.notice { background-color: #e3f2fd; color: #0d47a1; padding: 12px 16px; border-radius: 8px; margin-bottom: 20px; }
"#;

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn is_web_link(link: &str) -> bool {
    link.starts_with("https://") || link.starts_with("http://")
}

fn sentiment_class(label: SentimentLabel) -> &'static str {
    match label {
        SentimentLabel::Positive => "positive",
        SentimentLabel::Negative => "negative",
        SentimentLabel::Neutral | SentimentLabel::Unknown => "neutral",
    }
}

pub fn card(entry: &ScoredArticle) -> String {
    let article = &entry.article;
    let title = if is_web_link(&article.link) {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape(&article.link),
            escape(&article.title)
        )
    } else {
        escape(&article.title)
    };

    format!(
        r#"<div class="card">
  <h2>{number}. {title}</h2>
  <p class="meta"><strong>Source:</strong> {media} | <strong>Published on:</strong> {date}</p>
  <p class="text {class}"><strong>Summary:</strong> {summary}</p>
  <p class="text">{description}</p>
</div>
"#,
        number = entry.number,
        title = title,
        media = escape(&article.media),
        date = escape(&article.date),
        class = sentiment_class(entry.annotation.label),
        summary = escape(&entry.annotation.summary()),
        description = escape(&article.description),
    )
}

fn topic_options(selected: Topic) -> String {
    let mut options = String::new();
    for topic in Topic::ALL {
        let _ = write!(
            options,
            r#"<option value="{}"{}>{}</option>"#,
            topic.slug(),
            if topic == selected { " selected" } else { "" },
            escape(topic.display_name())
        );
    }
    options
}

/// Renders the whole dashboard page for one session.
pub fn page(view: &DashboardView) -> String {
    let selected = view.topic.unwrap_or_default();

    let mut body = String::new();
    for entry in &view.cards {
        body.push_str(&card(entry));
    }

    // Scoring faults sit above the cards, everything else below them.
    let notice = match (&view.notice, &view.message) {
        (Some(notice), Some(message)) => Some((notice, format!(r#"<div class="notice">{}</div>"#, escape(message)))),
        _ => None,
    };
    let (above, below) = match notice {
        Some((Notice::ScoringFaults(_), html)) => (html, String::new()),
        Some((_, html)) => (String::new(), html),
        None => (String::new(), String::new()),
    };

    let load_more = if view.can_load_more {
        r#"<form method="post" action="/more"><button type="submit">📥 Load More</button></form>"#
    } else {
        ""
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Stock Investor News</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>💹</text></svg>">
<style>{style}</style>
</head>
<body>
<div class="banner"><h1>💹 Stock Investor News 💹</h1></div>
<h2>📰 Get the Latest Stock Market &amp; Business News</h2>
<form class="controls" method="post" action="/fetch">
  <label>Select a topic<br><select name="topic">{options}</select></label>
  <button type="submit">🔍 Fetch News</button>
</form>
{above}{cards}{below}{load_more}
</body>
</html>
"#,
        style = STYLE,
        options = topic_options(selected),
        above = above,
        cards = body,
        below = below,
        load_more = load_more,
    )
}
