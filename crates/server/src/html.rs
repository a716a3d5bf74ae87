//! Server-rendered listing of stored submissions.

use std::fmt::Write;

use service::records::{domain::FormRecord, timestamp::display_local};

const STYLE: &str = r#"
      body { font-family: 'Segoe UI', sans-serif; background: #f3f4f6; color: #111827; padding: 30px; }
      h1 { text-align: center; color: #2563eb; margin-bottom: 20px; }
      table { width: 100%; border-collapse: collapse; background: white; border-radius: 10px; overflow: hidden; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
      th, td { padding: 12px 15px; text-align: left; border-bottom: 1px solid #e5e7eb; }
      th { background: #2563eb; color: white; }
      tr:hover { background-color: #f9fafb; }
      .no-data { text-align: center; color: #6b7280; padding: 40px; }
"#;

/// Escape text for use inside element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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

pub fn render_records(records: &[FormRecord]) -> String {
    let show_author = records.iter().any(|r| r.submitted_by.is_some());
    let body = if records.is_empty() {
        r#"<div class="no-data">Aún no hay formularios enviados</div>"#.to_string()
    } else {
        let mut rows = String::new();
        for r in records {
            let _ = write!(
                rows,
                "\n          <tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
                escape(&r.name),
                escape(&r.email),
                escape(&r.message),
                escape(&display_local(&r.submitted_at)),
            );
            if show_author {
                let _ = write!(rows, "<td>{}</td>", escape(r.submitted_by.as_deref().unwrap_or("")));
            }
            rows.push_str("</tr>");
        }
        let author_header = if show_author { "<th>Usuario</th>" } else { "" };
        format!(
            r#"<table>
        <thead>
          <tr><th>Nombre</th><th>Email</th><th>Mensaje</th><th>Fecha</th>{author_header}</tr>
        </thead>
        <tbody>{rows}
        </tbody>
      </table>"#
        )
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="UTF-8">
    <title>Formularios Recibidos</title>
    <style>{STYLE}</style>
  </head>
  <body>
    <h1>Formularios Recibidos</h1>
    {body}
  </body>
</html>
"#
    )
}

pub fn render_index() -> String {
    "<!DOCTYPE html><html lang=\"es\"><body><h2>Servidor de formularios activo</h2></body></html>".to_string()
}
