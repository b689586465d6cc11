use crate::database::MongoDB;
use crate::models::{Language, PassionResults, UserProfile};
use crate::services::profile_service;
use chrono::Utc;
use printpdf::{BuiltinFont, Color, Line, Mm, PdfDocument, Point, Rgb};
use std::io::BufWriter;

/// A finished download: bytes plus the headers the handler needs.
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Attachment header carrying the filename both quoted and
    /// percent-encoded (RFC 5987), so non-ASCII names survive every client.
    pub fn content_disposition(&self) -> String {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            self.filename,
            urlencoding::encode(&self.filename)
        )
    }
}

fn export_code(profile: &UserProfile) -> String {
    profile
        .public_code
        .clone()
        .unwrap_or_else(|| profile.user_id.clone())
}

// ---------------------------------------------------------------------------
// Plain-text report
// ---------------------------------------------------------------------------

struct ReportLabels {
    title: &'static str,
    name: &'static str,
    code: &'static str,
    school: &'static str,
    date: &'static str,
    ranking: &'static str,
    solutions: &'static str,
    narrative: &'static str,
}

fn report_labels(language: Language) -> ReportLabels {
    match language {
        Language::En => ReportLabels {
            title: "PASSION DISCOVERY JOURNEY REPORT",
            name: "Name",
            code: "Code",
            school: "School",
            date: "Date",
            ranking: "RANKING",
            solutions: "Suggested solutions",
            narrative: "YOUR STORY",
        },
        Language::Ar => ReportLabels {
            title: "تقرير رحلة اكتشاف الشغف",
            name: "الاسم",
            code: "الرمز",
            school: "المدرسة",
            date: "التاريخ",
            ranking: "الترتيب",
            solutions: "حلول مقترحة",
            narrative: "قصتك",
        },
    }
}

pub async fn text_report(
    db: &MongoDB,
    user_id: &str,
    language: Option<Language>,
) -> Result<ExportFile, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    let results = profile
        .results
        .as_ref()
        .ok_or_else(|| "Rank the journey before exporting the report".to_string())?;
    let language = profile.effective_language(language);

    let body = build_text_report(&profile, results, language);
    let filename = format!("passion-report-{}.txt", export_code(&profile));

    log::info!("📄 Text report exported for user {}", user_id);

    Ok(ExportFile {
        filename,
        content_type: "text/plain; charset=utf-8",
        bytes: body.into_bytes(),
    })
}

fn build_text_report(profile: &UserProfile, results: &PassionResults, language: Language) -> String {
    let labels = report_labels(language);
    let bar = "=".repeat(60);
    let thin = "-".repeat(60);
    let mut out = String::new();

    out.push_str(&format!("{}\n", bar));
    out.push_str(&format!("{:^60}\n", labels.title));
    out.push_str(&format!("{}\n\n", bar));

    out.push_str(&format!("{}: {}\n", labels.name, profile.display_name()));
    out.push_str(&format!("{}: {}\n", labels.code, export_code(profile)));
    if let Some(school) = &profile.school_name {
        if !school.trim().is_empty() {
            out.push_str(&format!("{}: {}\n", labels.school, school));
        }
    }
    out.push_str(&format!(
        "{}: {}\n\n",
        labels.date,
        Utc::now().format("%Y-%m-%d")
    ));

    out.push_str(&format!("{}\n{}\n{}\n", thin, labels.ranking, thin));
    for (index, ranking) in results.rankings.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({:.0}/100)\n",
            index + 1,
            ranking.name,
            ranking.score
        ));
        out.push_str(&format!("   {}\n", ranking.justification));

        let solutions = profile
            .journey
            .iter()
            .find(|e| e.name == ranking.name)
            .and_then(|e| e.solutions.as_ref());
        if let Some(solutions) = solutions {
            if !solutions.is_empty() {
                out.push_str(&format!("   {}:\n", labels.solutions));
                for solution in solutions {
                    out.push_str(&format!("   - {}\n", solution));
                }
            }
        }
        out.push('\n');
    }

    if let Some(narrative) = &results.narrative {
        out.push_str(&format!("{}\n{}\n{}\n", thin, labels.narrative, thin));
        out.push_str(narrative);
        out.push('\n');
    }

    out
}

// ---------------------------------------------------------------------------
// PDF certificate
// ---------------------------------------------------------------------------

/// Renders the completion certificate. The displayed name defaults to the
/// profile but the client may pass its own, matching what the user typed on
/// the download form. Builtin PDF fonts carry no Arabic glyphs, so the
/// certificate text itself is English.
pub async fn certificate_pdf(
    db: &MongoDB,
    user_id: &str,
    name_override: Option<String>,
) -> Result<ExportFile, String> {
    let profile = profile_service::get_profile(db, user_id).await?;
    let results = profile
        .results
        .as_ref()
        .ok_or_else(|| "Rank the journey before requesting a certificate".to_string())?;
    let top = results
        .top_passion()
        .ok_or_else(|| "The stored ranking is empty".to_string())?;

    let display_name = name_override
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| profile.display_name().to_string());
    let top_name = top.name.clone();
    let date = Utc::now().format("%B %d, %Y").to_string();

    // Rendering is pure CPU work, keep it off the async workers
    let bytes = tokio::task::spawn_blocking(move || {
        render_certificate(&display_name, &top_name, &date)
    })
    .await
    .map_err(|e| format!("Certificate task failed: {}", e))??;

    let filename = format!("passion-certificate-{}.pdf", export_code(&profile));

    log::info!("📜 Certificate exported for user {}", user_id);

    Ok(ExportFile {
        filename,
        content_type: "application/pdf",
        bytes,
    })
}

fn render_certificate(name: &str, passion: &str, date: &str) -> Result<Vec<u8>, String> {
    // A4 landscape
    let (doc, page, layer) = PdfDocument::new("Passion Journey Certificate", Mm(297.0), Mm(210.0), "certificate");
    let layer = doc.get_page(page).get_layer(layer);

    let title_font = doc
        .add_builtin_font(BuiltinFont::TimesBold)
        .map_err(|e| format!("Failed to load certificate font: {}", e))?;
    let text_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| format!("Failed to load certificate font: {}", e))?;
    let accent_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| format!("Failed to load certificate font: {}", e))?;

    // Double border
    layer.set_outline_color(Color::Rgb(Rgb::new(0.13, 0.23, 0.42, None)));
    layer.set_outline_thickness(2.0);
    layer.add_line(border_line(10.0, 10.0, 287.0, 200.0));
    layer.set_outline_thickness(0.7);
    layer.add_line(border_line(14.0, 14.0, 283.0, 196.0));

    layer.use_text("CERTIFICATE OF COMPLETION", 28.0, Mm(78.0), Mm(168.0), &title_font);
    layer.use_text("Passion Discovery Journey", 16.0, Mm(110.0), Mm(152.0), &text_font);

    layer.use_text("This certifies that", 13.0, Mm(122.0), Mm(126.0), &text_font);
    layer.use_text(name, 26.0, Mm(95.0), Mm(110.0), &accent_font);
    layer.use_text(
        "travelled all five stations of the journey and discovered a top passion:",
        13.0,
        Mm(63.0),
        Mm(94.0),
        &text_font,
    );
    layer.use_text(passion, 22.0, Mm(105.0), Mm(78.0), &accent_font);

    layer.use_text(date, 12.0, Mm(34.0), Mm(34.0), &text_font);
    layer.use_text("Passion Journey", 12.0, Mm(220.0), Mm(34.0), &text_font);

    let mut bytes = Vec::new();
    {
        let mut writer = BufWriter::new(&mut bytes);
        doc.save(&mut writer)
            .map_err(|e| format!("Failed to write certificate: {}", e))?;
    }
    Ok(bytes)
}

fn border_line(left: f32, bottom: f32, right: f32, top: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(left.into()), Mm(bottom.into())), false),
            (Point::new(Mm(right.into()), Mm(bottom.into())), false),
            (Point::new(Mm(right.into()), Mm(top.into())), false),
            (Point::new(Mm(left.into()), Mm(top.into())), false),
        ],
        is_closed: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnswerWeight, JourneyEntry, PassionRanking, StationAnswer};

    fn profile_with_results() -> UserProfile {
        let mut entry = JourneyEntry::new("Calligraphy");
        entry.problems.push(StationAnswer {
            text: "Good pens are hard to find".to_string(),
            weight: AnswerWeight::Low,
        });
        entry.solutions = Some(vec!["Order a starter set online".to_string()]);

        UserProfile {
            _id: None,
            user_id: "u-9".to_string(),
            email: "rami@example.com".to_string(),
            password: None,
            name: Some("Rami".to_string()),
            phone: None,
            education_status: None,
            school_name: Some("Dar Al Uloom".to_string()),
            public_code: Some("9F3A21BC".to_string()),
            language: Some("en".to_string()),
            roles: vec!["user".to_string()],
            is_active: true,
            journey: vec![entry],
            results: Some(PassionResults {
                rankings: vec![PassionRanking {
                    name: "Calligraphy".to_string(),
                    score: 86.0,
                    justification: "Purpose and proof carry it".to_string(),
                }],
                narrative: Some("Your journey showed a steady hand.".to_string()),
                language: "en".to_string(),
                generated_at: 1700000000,
            }),
            reset_token: None,
            reset_token_expires: None,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    #[test]
    fn test_text_report_contains_ranking_and_solutions() {
        let profile = profile_with_results();
        let results = profile.results.clone().unwrap();
        let report = build_text_report(&profile, &results, Language::En);

        assert!(report.contains("PASSION DISCOVERY JOURNEY REPORT"));
        assert!(report.contains("Name: Rami"));
        assert!(report.contains("Code: 9F3A21BC"));
        assert!(report.contains("School: Dar Al Uloom"));
        assert!(report.contains("1. Calligraphy (86/100)"));
        assert!(report.contains("Order a starter set online"));
        assert!(report.contains("Your journey showed a steady hand."));
    }

    #[test]
    fn test_text_report_arabic_labels() {
        let profile = profile_with_results();
        let results = profile.results.clone().unwrap();
        let report = build_text_report(&profile, &results, Language::Ar);

        assert!(report.contains("تقرير رحلة اكتشاف الشغف"));
        assert!(report.contains("الاسم: Rami"));
        assert!(report.contains("الترتيب"));
    }

    #[test]
    fn test_certificate_renders_pdf_bytes() {
        let bytes = render_certificate("Rami", "Calligraphy", "August 25, 2026").unwrap();
        assert!(bytes.len() > 1000);
        assert_eq!(&bytes[..5], b"%PDF-");
    }

    #[test]
    fn test_export_code_falls_back_to_user_id() {
        let mut profile = profile_with_results();
        assert_eq!(export_code(&profile), "9F3A21BC");
        profile.public_code = None;
        assert_eq!(export_code(&profile), "u-9");
    }

    #[test]
    fn test_content_disposition_percent_encodes_filename() {
        let file = ExportFile {
            filename: "تقرير 1.txt".to_string(),
            content_type: "text/plain; charset=utf-8",
            bytes: Vec::new(),
        };
        let header = file.content_disposition();
        assert!(header.starts_with("attachment; filename=\"تقرير 1.txt\""));
        assert!(header.contains("filename*=UTF-8''%D8%AA%D9%82%D8%B1%D9%8A%D8%B1%201.txt"));
    }
}
