//! Doctor-facing report, plain-text tracker context and PDF export.
//!
//! The report is assembled from an already computed [`Summary`]; nothing here
//! reads the store or the clock.

use chrono::NaiveDate;
use printpdf::*;
use serde::Serialize;
use std::io::BufWriter;

use super::types::{Summary, Trend};
use crate::store::DateWindow;

pub const FALLBACK_PATIENT_NAME: &str = "Patient";
pub const TOP_SYMPTOMS: usize = 5;

pub const DOCTOR_QUESTIONS: [&str; 4] = [
    "Based on my symptom patterns, what treatment options should we consider?",
    "Are there lifestyle changes that could help manage my symptoms?",
    "Should I be concerned about any of these patterns?",
    "What follow-up testing or monitoring do you recommend?",
];

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),
    #[error("PDF save error: {0}")]
    Save(String),
    #[error("PDF buffer error: {0}")]
    Buffer(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorReport {
    pub patient_name: String,
    pub date_range: ReportDateRange,
    pub summary: ReportSummary,
    pub patterns: Vec<String>,
    pub questions: Vec<String>,
}

/// Dates as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportDateRange {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_symptoms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_severity: Option<f64>,
    pub most_frequent_symptoms: Vec<FrequentSymptom>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequentSymptom {
    pub name: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_severity: Option<f64>,
    pub trend: Trend,
}

/// Trimmed profile name, or the fallback when there is none.
pub(crate) fn patient_display_name(patient_name: Option<&str>) -> String {
    patient_name
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(FALLBACK_PATIENT_NAME)
        .to_string()
}

impl ReportDateRange {
    pub(crate) fn of_days(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: start.format("%Y-%m-%d").to_string(),
            end: end.format("%Y-%m-%d").to_string(),
        }
    }
}

pub fn build_doctor_report(summary: &Summary, patient_name: Option<&str>, window: &DateWindow) -> DoctorReport {
    let patient_name = patient_display_name(patient_name);

    let mut frequent: Vec<FrequentSymptom> = summary
        .symptoms
        .by_name
        .iter()
        .map(|(name, stats)| FrequentSymptom {
            name: name.clone(),
            count: stats.count,
            avg_severity: stats.avg_severity,
            trend: stats.trend,
        })
        .collect();
    frequent.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    frequent.truncate(TOP_SYMPTOMS);

    DoctorReport {
        patient_name,
        date_range: ReportDateRange::of_days(window.start_date(), window.end_date()),
        summary: ReportSummary {
            total_symptoms: summary.symptoms.total,
            average_severity: summary.symptoms.avg_severity,
            most_frequent_symptoms: frequent,
        },
        patterns: summary.plain_language_insights.iter().map(|i| i.text.clone()).collect(),
        questions: DOCTOR_QUESTIONS.iter().map(|q| q.to_string()).collect(),
    }
}

// ═══════════════════════════════════════════
// Plain-text context
// ═══════════════════════════════════════════

/// Renders the summary as a plain-text block for downstream companions.
pub fn format_tracker_context(summary: &Summary, days: u32) -> String {
    let mut parts: Vec<String> = Vec::new();
    parts.push(format!("=== USER TRACKER DATA (Last {days} days) ==="));

    parts.push("\nSYMPTOMS:".into());
    let symptoms = &summary.symptoms;
    if symptoms.total == 0 {
        parts.push("- No symptoms logged".into());
    } else {
        parts.push(format!("- Total logged: {}", symptoms.total));
        if let Some(avg) = symptoms.avg_severity {
            parts.push(format!("- Average severity: {avg}/3"));
        }
        parts.push(format!("- Overall trend: {}", symptoms.trend.as_str()));
        parts.push("- By symptom:".into());
        for (name, stats) in &symptoms.by_name {
            let avg = stats.avg_severity.map(|a| a.to_string()).unwrap_or_else(|| "-".into());
            parts.push(format!(
                "  * {name}: {} occurrences, avg severity {avg}/3, trend: {}",
                stats.count,
                stats.trend.as_str()
            ));
        }
    }

    parts.push("\nMOOD:".into());
    match summary.mood.avg_mood {
        Some(avg) => {
            parts.push(format!("- Days logged: {}", summary.mood.days_logged));
            parts.push(format!("- Average mood: {avg}/4"));
            parts.push(format!("- Good days: {}", summary.mood.good_days));
            parts.push(format!("- Trend: {}", summary.mood.trend.as_str()));
        }
        None => parts.push("- No mood check-ins logged".into()),
    }

    parts.push("\nNUTRITION:".into());
    let nutrition = &summary.nutrition;
    if nutrition.total == 0 {
        parts.push("- No nutrition entries logged".into());
    } else {
        parts.push(format!("- Total entries: {}", nutrition.total));
        if let Some(calories) = nutrition.avg_calories {
            parts.push(format!("- Average calories per entry: {calories}"));
        }
        parts.push("- By meal type:".into());
        for (meal, count) in &nutrition.by_meal_type {
            parts.push(format!("  * {}: {count} entries", meal.as_str()));
        }
    }
    if nutrition.hydration.weekly_average > 0.0 {
        parts.push(format!(
            "- Water: {} glasses a day over the last week",
            nutrition.hydration.weekly_average
        ));
    }

    parts.push("\nFITNESS:".into());
    let fitness = &summary.fitness;
    if fitness.total == 0 {
        parts.push("- No workouts logged".into());
    } else {
        parts.push(format!("- Total workouts: {}", fitness.total));
        parts.push(format!("- Average workouts per week: {}", fitness.avg_workouts_per_week));
        if let Some(duration) = fitness.avg_duration {
            parts.push(format!("- Average duration: {duration} minutes"));
        }
        parts.push("- By exercise type:".into());
        for (kind, count) in &fitness.by_type {
            parts.push(format!("  * {kind}: {count} workouts"));
        }
    }

    if !summary.plain_language_insights.is_empty() {
        parts.push("\nPATTERNS & INSIGHTS:".into());
        for insight in &summary.plain_language_insights {
            parts.push(format!("- {}", insight.text));
        }
    }

    parts.push("\n=== END TRACKER DATA ===\n".into());
    parts.join("\n")
}

// ═══════════════════════════════════════════
// PDF
// ═══════════════════════════════════════════

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const TOP_MARGIN: f32 = 280.0;
const BOTTOM_MARGIN: f32 = 20.0;

/// Cursor over an A4 document that opens a fresh page when the current one is full.
struct PdfCursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    font: IndirectFontRef,
    bold: IndirectFontRef,
    y: Mm,
}

impl PdfCursor {
    fn new(title: &str) -> Result<Self, ReportError> {
        let (doc, page1, layer1) = PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        Ok(Self { doc, layer, font, bold, y: Mm(TOP_MARGIN) })
    }

    fn ensure_room(&mut self) {
        if self.y < Mm(BOTTOM_MARGIN) {
            let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = Mm(TOP_MARGIN);
        }
    }

    fn heading(&mut self, text: &str, size: f32) {
        self.ensure_room();
        self.layer.use_text(text, size, Mm(20.0), self.y, &self.bold);
        self.y -= Mm(6.0);
    }

    fn line(&mut self, text: &str) {
        self.ensure_room();
        self.layer.use_text(text, 9.0, Mm(25.0), self.y, &self.font);
        self.y -= Mm(4.5);
    }

    fn paragraph(&mut self, text: &str) {
        for line in wrap_text(text, 80) {
            self.line(&line);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= Mm(mm);
    }

    fn finish(self) -> Result<Vec<u8>, ReportError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(|e| ReportError::Save(e.to_string()))?;
        buf.into_inner().map_err(|e| ReportError::Buffer(e.to_string()))
    }
}

/// Renders the report as PDF bytes.
pub fn render_pdf(report: &DoctorReport) -> Result<Vec<u8>, ReportError> {
    let title = format!("Symptom report for {}", report.patient_name);
    let mut pdf = PdfCursor::new(&title)?;

    pdf.heading(&title, 14.0);
    pdf.line(&format!("Period: {} to {}", report.date_range.start, report.date_range.end));
    pdf.gap(6.0);

    pdf.heading("SUMMARY:", 11.0);
    pdf.line(&format!("Total symptoms logged: {}", report.summary.total_symptoms));
    if let Some(avg) = report.summary.average_severity {
        pdf.line(&format!("Average severity: {avg} / 3"));
    }
    pdf.gap(4.0);

    if !report.summary.most_frequent_symptoms.is_empty() {
        pdf.heading("MOST FREQUENT SYMPTOMS:", 11.0);
        for s in &report.summary.most_frequent_symptoms {
            let avg = s.avg_severity.map(|a| format!(", avg severity {a}")).unwrap_or_default();
            pdf.paragraph(&format!("- {}: {} logs{avg}, {}", s.name, s.count, s.trend.as_str()));
        }
        pdf.gap(4.0);
    }

    if !report.patterns.is_empty() {
        pdf.heading("PATTERNS NOTICED:", 11.0);
        for pattern in &report.patterns {
            pdf.paragraph(&format!("- {pattern}"));
            pdf.gap(1.5);
        }
        pdf.gap(4.0);
    }

    pdf.heading("QUESTIONS FOR MY DOCTOR:", 11.0);
    for (i, q) in report.questions.iter().enumerate() {
        pdf.paragraph(&format!("{}. {q}", i + 1));
        pdf.gap(1.5);
    }

    pdf.finish()
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::analyze;
    use crate::models::enums::Severity;
    use crate::models::SymptomLog;
    use crate::store::TrackerData;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn window() -> DateWindow {
        DateWindow::ending_at(Utc.with_ymd_and_hms(2026, 2, 28, 18, 0, 0).unwrap(), 30)
    }

    fn data() -> TrackerData {
        let names = ["Hot flashes", "Hot flashes", "Fatigue", "Brain fog", "Joint pain", "Anxiety", "Insomnia", "Fatigue"];
        let mut data = TrackerData::empty(window());
        data.symptom_logs = names
            .iter()
            .enumerate()
            .map(|(i, name)| SymptomLog {
                id: Uuid::new_v4(),
                user_id: Uuid::nil(),
                symptom_id: Uuid::nil(),
                symptom_name: Some(name.to_string()),
                severity: Severity::Moderate,
                triggers: Default::default(),
                notes: None,
                logged_at: Utc.with_ymd_and_hms(2026, 2, 2 + i as u32, 9, 0, 0).unwrap(),
            })
            .collect();
        data
    }

    #[test]
    fn report_ranks_top_five_by_count_then_name() {
        let data = data();
        let report = build_doctor_report(&analyze(&data), Some("Ada Lovelace"), &data.window);
        assert_eq!(report.patient_name, "Ada Lovelace");
        assert_eq!(report.summary.total_symptoms, 8);
        assert_eq!(report.summary.average_severity, Some(2.0));

        let names: Vec<_> = report.summary.most_frequent_symptoms.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Fatigue", "Hot flashes", "Anxiety", "Brain fog", "Insomnia"]);
        assert_eq!(report.questions.len(), 4);
        assert_eq!(report.date_range.start, "2026-01-29");
        assert_eq!(report.date_range.end, "2026-02-28");
    }

    #[test]
    fn missing_or_blank_name_falls_back() {
        let data = TrackerData::empty(window());
        let summary = analyze(&data);
        assert_eq!(build_doctor_report(&summary, None, &data.window).patient_name, "Patient");
        assert_eq!(build_doctor_report(&summary, Some("  "), &data.window).patient_name, "Patient");
    }

    #[test]
    fn report_serializes_camel_case() {
        let data = data();
        let report = build_doctor_report(&analyze(&data), None, &data.window);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("patientName").is_some());
        assert!(json["summary"].get("mostFrequentSymptoms").is_some());
        assert_eq!(json["dateRange"]["end"], "2026-02-28");
    }

    #[test]
    fn context_block_lists_sections() {
        let data = data();
        let text = format_tracker_context(&analyze(&data), 30);
        assert!(text.starts_with("=== USER TRACKER DATA (Last 30 days) ==="));
        assert!(text.contains("- Total logged: 8"));
        assert!(text.contains("  * Fatigue: 2 occurrences, avg severity 2/3, trend: stable"));
        assert!(text.contains("- No workouts logged"));
        assert!(text.trim_end().ends_with("=== END TRACKER DATA ==="));
    }

    #[test]
    fn pdf_renders_across_pages() {
        let data = data();
        let mut report = build_doctor_report(&analyze(&data), Some("Ada"), &data.window);
        report.patterns = (0..80).map(|i| format!("Pattern number {i} with enough words to wrap onto a second line of output text.")).collect();
        let bytes = render_pdf(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six", 10);
        assert_eq!(lines, vec!["one two", "three four", "five six"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
