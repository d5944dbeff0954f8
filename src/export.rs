//! Catalog report generation (HTML and Markdown)
//!
//! Both renderers are pure functions of the records and options. With a
//! caller-fixed `generated_at` the output is byte-deterministic, which is
//! what the tests rely on.

use crate::model::{total_size_bytes, CatalogRecord};
use chrono::{DateTime, Utc};
use std::fmt::Write as _;

/// Report target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Html,
    Markdown,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Html => "html",
            ExportFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Report title; defaults to "Video Catalog"
    pub title: Option<String>,
    /// Generation timestamp embedded in the report; `None` means now
    pub generated_at: Option<DateTime<Utc>>,
}

impl ExportOptions {
    fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Video Catalog")
    }

    fn generated_date(&self) -> String {
        self.generated_at
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%d")
            .to_string()
    }
}

/// Render a catalog report in the requested format.
pub fn render(records: &[CatalogRecord], format: ExportFormat, options: &ExportOptions) -> String {
    match format {
        ExportFormat::Html => render_html(records, options),
        ExportFormat::Markdown => render_markdown(records, options),
    }
}

/// Suggested default file name, e.g. `catalog_2026-08-24.html`.
pub fn default_export_filename(format: ExportFormat) -> String {
    format!(
        "catalog_{}.{}",
        Utc::now().format("%Y-%m-%d"),
        format.extension()
    )
}

/// Human size with binary-prefix units at 1024 scale, two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", value, UNITS[unit])
}

/// Distinct extensions in first-seen order, empty ones skipped.
fn distinct_extensions(records: &[CatalogRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    for record in records {
        if !record.extension.is_empty() && !seen.contains(&record.extension) {
            seen.push(record.extension.clone());
        }
    }
    seen
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

/// Escape characters that would break a Markdown table cell.
fn escape_markdown(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '_' | '`' | '\\' | '|') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn render_markdown(records: &[CatalogRecord], options: &ExportOptions) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {}\n", options.title());
    let _ = writeln!(md, "*Generated on {}*\n", options.generated_date());
    md.push_str("## Statistics\n\n");
    let _ = writeln!(md, "- **Total videos**: {}", records.len());

    if !records.is_empty() {
        let _ = writeln!(
            md,
            "- **Total size**: {}",
            format_size(total_size_bytes(records))
        );
        let _ = writeln!(
            md,
            "- **Extensions**: {}\n",
            distinct_extensions(records).join(", ")
        );

        md.push_str("## Video list\n\n");
        md.push_str("| Name | Size | Extension | Folder |\n");
        md.push_str("|------|------|-----------|--------|\n");
        for record in records {
            let _ = writeln!(
                md,
                "| {} | {} | {} | {} |",
                escape_markdown(&record.name),
                format_size(record.size_bytes),
                record.extension.trim_start_matches('.'),
                escape_markdown(&record.folder),
            );
        }
    }

    md
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

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

const HTML_STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
    padding: 20px;
}
.container {
    max-width: 1400px;
    margin: 0 auto;
    background: white;
    border-radius: 15px;
    box-shadow: 0 20px 40px rgba(0,0,0,0.1);
    overflow: hidden;
}
.header {
    background: linear-gradient(135deg, #2c3e50 0%, #34495e 100%);
    color: white;
    padding: 30px;
    text-align: center;
}
.header h1 { font-size: 2.5em; margin-bottom: 10px; font-weight: 300; }
.header p { opacity: 0.8; font-size: 1.1em; }
.controls { padding: 20px 30px; background: #f8f9fa; border-bottom: 1px solid #e9ecef; }
.search-box {
    width: 100%;
    padding: 12px 20px;
    border: 2px solid #e9ecef;
    border-radius: 25px;
    font-size: 16px;
    outline: none;
}
.search-box:focus { border-color: #667eea; }
.stats { margin-top: 15px; display: flex; justify-content: space-between; flex-wrap: wrap; gap: 10px; }
.stat-item {
    background: white;
    padding: 10px 20px;
    border-radius: 20px;
    box-shadow: 0 2px 10px rgba(0,0,0,0.1);
    font-weight: 500;
}
.table-container { overflow-x: auto; max-height: 70vh; }
table { width: 100%; border-collapse: collapse; font-size: 14px; }
th {
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    color: white;
    padding: 15px 12px;
    text-align: left;
    font-weight: 600;
    position: sticky;
    top: 0;
    cursor: pointer;
    user-select: none;
}
td { padding: 12px; border-bottom: 1px solid #e9ecef; vertical-align: middle; }
tr:hover { background-color: #f8f9fa; }
tr:nth-child(even) { background-color: #fdfdfd; }
.video-link { color: #2c3e50; text-decoration: none; font-weight: 500; }
.video-link:hover { color: #667eea; text-decoration: underline; }
.size-cell { text-align: right; white-space: nowrap; }
.ext-badge {
    background: #e9ecef;
    padding: 2px 6px;
    border-radius: 10px;
    font-size: 10px;
    text-transform: uppercase;
    color: #495057;
}
.folder-cell { color: #6c757d; font-size: 12px; word-break: break-all; }
.actions-cell { text-align: center; white-space: nowrap; }
.action-btn {
    background: #28a745;
    color: white;
    padding: 4px 8px;
    margin: 1px;
    border-radius: 3px;
    font-size: 11px;
    text-decoration: none;
    display: inline-block;
}
.folder-btn { background: #17a2b8; }
.error-row { background-color: #fff3cd !important; }
.no-results { text-align: center; padding: 50px; color: #6c757d; font-size: 18px; }
"#;

const HTML_SCRIPT: &str = r#"
document.getElementById('searchBox').addEventListener('input', function () {
    const term = this.value.toLowerCase();
    const rows = document.querySelectorAll('#videoTableBody tr');
    let visible = 0;
    rows.forEach(row => {
        const match = row.dataset.name.includes(term) || row.dataset.extension.includes(term);
        row.style.display = match ? '' : 'none';
        if (match) visible++;
    });
    document.getElementById('visibleCount').textContent = visible;
    document.getElementById('noResults').style.display = visible === 0 ? 'block' : 'none';
    document.getElementById('videoTable').style.display = visible === 0 ? 'none' : 'table';
});

let sortDirection = {};
function sortTable(column) {
    const tbody = document.getElementById('videoTableBody');
    const rows = Array.from(tbody.querySelectorAll('tr'));
    const ascending = sortDirection[column] !== true;
    sortDirection = {};
    sortDirection[column] = ascending;
    rows.sort((a, b) => {
        if (column === 1) {
            const av = parseInt(a.dataset.size, 10);
            const bv = parseInt(b.dataset.size, 10);
            return ascending ? av - bv : bv - av;
        }
        const av = a.cells[column].textContent.trim().toLowerCase();
        const bv = b.cells[column].textContent.trim().toLowerCase();
        return ascending ? av.localeCompare(bv) : bv.localeCompare(av);
    });
    rows.forEach(row => tbody.appendChild(row));
}
"#;

pub fn render_html(records: &[CatalogRecord], options: &ExportOptions) -> String {
    let title = escape_html(options.title());
    let date = options.generated_date();
    let total = format_size(total_size_bytes(records));
    let count = records.len();

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "<style>{HTML_STYLE}</style>");
    html.push_str("</head>\n<body>\n<div class=\"container\">\n");

    let _ = writeln!(
        html,
        "<div class=\"header\">\n<h1>{title}</h1>\n<p>Generated on {date} \u{2022} {count} video{}</p>\n</div>",
        if count == 1 { "" } else { "s" }
    );

    html.push_str("<div class=\"controls\">\n");
    html.push_str(
        "<input type=\"text\" class=\"search-box\" id=\"searchBox\" \
         placeholder=\"Search by name or extension...\">\n",
    );
    html.push_str("<div class=\"stats\">\n");
    let _ = writeln!(
        html,
        "<div class=\"stat-item\"><span id=\"visibleCount\">{count}</span> / {count} videos shown</div>"
    );
    let _ = writeln!(
        html,
        "<div class=\"stat-item\">Total size: <span id=\"totalSize\">{total}</span></div>"
    );
    html.push_str("</div>\n</div>\n");

    html.push_str("<div class=\"table-container\">\n<table id=\"videoTable\">\n<thead>\n<tr>\n");
    html.push_str("<th onclick=\"sortTable(0)\">Name \u{2195}</th>\n");
    html.push_str("<th onclick=\"sortTable(1)\">Size \u{2195}</th>\n");
    html.push_str("<th onclick=\"sortTable(2)\">Extension \u{2195}</th>\n");
    html.push_str("<th>Folder</th>\n<th>Actions</th>\n");
    html.push_str("</tr>\n</thead>\n<tbody id=\"videoTableBody\">\n");

    for record in records {
        push_row(&mut html, record);
    }

    html.push_str("</tbody>\n</table>\n");
    html.push_str(
        "<div id=\"noResults\" class=\"no-results\" style=\"display: none;\">\
         No videos match your search.</div>\n",
    );
    html.push_str("</div>\n</div>\n");
    let _ = writeln!(html, "<script>{HTML_SCRIPT}</script>");
    html.push_str("</body>\n</html>\n");
    html
}

fn push_row(html: &mut String, record: &CatalogRecord) {
    let name = escape_html(&record.name);
    let folder = escape_html(&record.folder);
    let file_uri = escape_html(&format!("file://{}", record.absolute_path));
    let folder_uri = escape_html(&format!("file://{}", record.folder));
    let ext = escape_html(record.extension.trim_start_matches('.'));
    let row_class = if record.failed {
        " class=\"error-row\""
    } else {
        ""
    };

    let _ = writeln!(
        html,
        "<tr{row_class} data-name=\"{}\" data-extension=\"{}\" data-size=\"{}\">",
        escape_html(&record.name.to_lowercase()),
        escape_html(&record.extension.to_lowercase()),
        record.size_bytes
    );
    let _ = writeln!(
        html,
        "<td><a class=\"video-link\" href=\"{file_uri}\" title=\"{name}\">{name}</a></td>"
    );
    let _ = writeln!(
        html,
        "<td class=\"size-cell\" data-size=\"{}\">{}</td>",
        record.size_bytes,
        escape_html(&record.size_display)
    );
    let _ = writeln!(html, "<td><span class=\"ext-badge\">{ext}</span></td>");
    let _ = writeln!(
        html,
        "<td class=\"folder-cell\" title=\"{folder}\">{folder}</td>"
    );
    let _ = writeln!(
        html,
        "<td class=\"actions-cell\">\
         <a class=\"action-btn\" href=\"{file_uri}\" title=\"Open video\">\u{25b6}</a>\
         <a class=\"action-btn folder-btn\" href=\"{folder_uri}\" title=\"Open folder\">\u{1f4c1}</a>\
         </td>"
    );
    html.push_str("</tr>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_record;
    use chrono::TimeZone;

    fn fixed_options() -> ExportOptions {
        ExportOptions {
            title: Some("Test Catalog".to_string()),
            generated_at: Some(Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(15 * 1024 * 1024), "15.00 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3.00 GB");
        assert_eq!(format_size(2 * 1024_u64.pow(4)), "2.00 TB");
    }

    #[test]
    fn test_scenario_total_size_display() {
        // a.mp4 at 10 MB plus c.mkv at 5 MB => "15.00 MB"
        let records = vec![
            test_record("/v/a.mp4", 10 * 1024 * 1024),
            test_record("/v/c.mkv", 5 * 1024 * 1024),
        ];
        let md = render_markdown(&records, &fixed_options());
        assert!(md.contains("- **Total size**: 15.00 MB"));
        assert!(md.contains("- **Total videos**: 2"));
    }

    #[test]
    fn test_markdown_escapes_table_breaking_characters() {
        let mut record = test_record("/v/a.mp4", 10);
        record.name = "we|rd_name*.mp4".to_string();
        record.folder = "/videos/back\\slash".to_string();
        let md = render_markdown(&[record], &fixed_options());
        assert!(md.contains("we\\|rd\\_name\\*.mp4"));
        assert!(md.contains("/videos/back\\\\slash"));
    }

    #[test]
    fn test_markdown_empty_catalog_has_count_only() {
        let md = render_markdown(&[], &fixed_options());
        assert!(md.contains("- **Total videos**: 0"));
        assert!(!md.contains("| Name |"));
        assert!(!md.contains("Total size"));
    }

    #[test]
    fn test_markdown_lists_distinct_extensions() {
        let mut a = test_record("/v/a.mp4", 10);
        a.extension = ".mp4".to_string();
        let mut b = test_record("/v/b.mkv", 10);
        b.extension = ".mkv".to_string();
        let mut c = test_record("/v/c.mp4", 10);
        c.extension = ".mp4".to_string();
        let md = render_markdown(&[a, b, c], &fixed_options());
        assert!(md.contains("- **Extensions**: .mp4, .mkv"));
    }

    #[test]
    fn test_export_determinism_with_fixed_timestamp() {
        let records = vec![
            test_record("/v/a.mp4", 1024),
            test_record("/v/b.mkv", 2048),
        ];
        let options = fixed_options();
        assert_eq!(
            render(&records, ExportFormat::Html, &options),
            render(&records, ExportFormat::Html, &options)
        );
        assert_eq!(
            render(&records, ExportFormat::Markdown, &options),
            render(&records, ExportFormat::Markdown, &options)
        );
    }

    #[test]
    fn test_html_contains_file_links_and_stats() {
        let records = vec![test_record("/videos/a.mp4", 10 * 1024 * 1024)];
        let html = render_html(&records, &fixed_options());
        assert!(html.contains("<title>Test Catalog</title>"));
        assert!(html.contains("Generated on 2026-08-24"));
        assert!(html.contains("href=\"file:///videos/a.mp4\""));
        assert!(html.contains("href=\"file:///videos\""));
        assert!(html.contains("Total size: <span id=\"totalSize\">10.00 MB</span>"));
        assert!(html.contains("searchBox"));
        assert!(html.contains("function sortTable"));
    }

    #[test]
    fn test_html_escapes_record_text() {
        let mut record = test_record("/v/a.mp4", 10);
        record.name = "<b>&\"evil\".mp4".to_string();
        let html = render_html(&[record], &fixed_options());
        assert!(html.contains("&lt;b&gt;&amp;&quot;evil&quot;.mp4"));
        assert!(!html.contains("<b>&\"evil\".mp4"));
    }

    #[test]
    fn test_html_flags_failed_rows() {
        let mut record = test_record("/v/a.mp4", 0);
        record.failed = true;
        let html = render_html(&[record], &fixed_options());
        assert!(html.contains("class=\"error-row\""));
    }

    #[test]
    fn test_default_export_filename() {
        let name = default_export_filename(ExportFormat::Html);
        assert!(name.starts_with("catalog_"));
        assert!(name.ends_with(".html"));
        assert!(default_export_filename(ExportFormat::Markdown).ends_with(".md"));
    }
}
