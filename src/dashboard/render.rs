//! Server-rendered dashboard pages.
//!
//! Everything here is a pure function of the view state; every value that
//! came from a record, the model, or the user passes through `escape_html`.

use crate::dashboard::state::DashboardState;
use crate::decision::AnalysisReport;
use crate::inquiry::InquiryReport;
use crate::models::PatientRecord;
use crate::pipeline::rag::EvidenceSet;

const FEATURES: [(&str, &str); 4] = [
    (
        "Agent-Driven Queries",
        "Ask about the patient population in plain language.",
    ),
    (
        "Medical RAG",
        "Answers grounded in clinical guidelines and insurance policy.",
    ),
    (
        "Clinical Risk Intelligence",
        "Rule-based risk rationale for every patient.",
    ),
    (
        "Unified Analytics Dashboard",
        "Vitals, comorbidities and cohorts in one place.",
    ),
];

pub fn escape_html(input: &str) -> String {
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

/// Render the whole page for the current view.
pub fn render_page(state: &DashboardState, notice: Option<&str>, session_id: &str) -> String {
    let main = match state {
        DashboardState::Welcome => render_welcome(),
        DashboardState::Patient(report) => render_patient(report),
        DashboardState::Inquiry(report) => render_inquiry(report, session_id),
    };
    let notice = notice
        .map(|n| format!(r#"<div class="notice" role="alert">{}</div>"#, escape_html(n)))
        .unwrap_or_default();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Hospital Insight</title>
<style>
*,*::before,*::after{{box-sizing:border-box}}
body{{margin:0;font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:#f4f6f8;color:#1f2933;display:flex;min-height:100vh}}
aside{{width:280px;background:#0f2a3d;color:#e4ecf2;padding:24px;flex-shrink:0}}
aside h2{{font-size:.8rem;letter-spacing:.08em;text-transform:uppercase;color:#8fb3c9;margin:24px 0 8px}}
aside input{{width:100%;padding:10px;border-radius:8px;border:1px solid #2f4f66;background:#173a52;color:#fff;margin-bottom:8px}}
aside button{{width:100%;padding:10px;border:none;border-radius:8px;background:#14b8a6;color:#fff;font-weight:600;cursor:pointer}}
aside .secondary{{background:#334e68}}
main{{flex:1;padding:32px;max-width:1100px}}
h1{{margin:0 0 4px;font-size:1.6rem}}
.muted{{color:#627d98;font-size:.85rem}}
.notice{{background:#fff4e5;border:1px solid #f7c77e;border-radius:8px;padding:12px 16px;margin-bottom:16px}}
.grid{{display:grid;grid-template-columns:repeat(auto-fit,minmax(200px,1fr));gap:16px;margin:16px 0}}
.card{{background:#fff;border-radius:12px;box-shadow:0 2px 12px rgba(0,0,0,.06);padding:16px}}
.card .label{{font-size:.75rem;text-transform:uppercase;color:#829ab1}}
.card .value{{font-size:1.1rem;font-weight:600;margin-top:4px}}
.consult{{background:#fff;border-left:4px solid #14b8a6;border-radius:8px;padding:16px;white-space:pre-wrap}}
table{{width:100%;border-collapse:collapse;background:#fff;border-radius:12px;overflow:hidden}}
th,td{{text-align:left;padding:8px 12px;border-bottom:1px solid #e4e7eb;font-size:.9rem}}
th{{background:#f0f4f8}}
</style>
</head>
<body>
<aside>
  <strong>HOSPITAL INSIGHT</strong>
  <h2>Patient analysis</h2>
  <form method="post" action="/analyze">
    <input name="patient_id" placeholder="Patient ID" autocomplete="off">
    <button type="submit">Analyze patient</button>
  </form>
  <h2>Hospital inquiry</h2>
  <form method="post" action="/inquiry">
    <input name="query" placeholder="e.g. smokers with high cholesterol" autocomplete="off">
    <button type="submit">Run inquiry</button>
  </form>
  <h2>Session</h2>
  <form method="post" action="/clear">
    <button type="submit" class="secondary">Clear</button>
  </form>
</aside>
<main>
{notice}
{main}
</main>
</body>
</html>"##
    )
}

fn render_welcome() -> String {
    let features: String = FEATURES
        .iter()
        .map(|(title, text)| {
            format!(
                r#"<div class="card"><div class="value">{title}</div><p class="muted">{text}</p></div>"#
            )
        })
        .collect();
    format!(
        r#"<h1>HOSPITAL INSIGHT ENGINE</h1>
<p class="muted">Clinical decision support over patient records, guidelines and policy.</p>
<div class="grid">{features}</div>"#
    )
}

fn card(label: &str, value: &str) -> String {
    format!(
        r#"<div class="card"><div class="label">{label}</div><div class="value">{}</div></div>"#,
        escape_html(value)
    )
}

fn or_na(value: &str) -> &str {
    if value.trim().is_empty() {
        "N/A"
    } else {
        value
    }
}

fn vital(value: Option<i64>, unit: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v} {unit}"))
}

fn list_items(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return format!(r#"<p class="muted">{empty}</p>"#);
    }
    let lis: String = items
        .iter()
        .map(|i| format!("<li>{}</li>", escape_html(i)))
        .collect();
    format!("<ul>{lis}</ul>")
}

fn render_evidence(evidence: &EvidenceSet) -> String {
    format!(
        r#"<h3>Clinical guidelines</h3>{}<h3>Insurance policy</h3>{}"#,
        list_items(&evidence.clinical_evidence, "No clinical evidence retrieved."),
        list_items(&evidence.insurance_evidence, "No insurance evidence retrieved."),
    )
}

fn case_summary(p: &PatientRecord) -> String {
    let comorbidities = p.comorbidities();
    let comorbidities = if comorbidities.is_empty() {
        "none recorded".to_string()
    } else {
        comorbidities.join(", ")
    };
    format!(
        "{} visited on {} with a diagnosis of {}. Current medication: {} {}. \
         Insurance: {} (insured: {}). Smoking status: {}. Comorbidities: {}.",
        p.patient_name,
        or_na(&p.visit_date),
        or_na(&p.diagnosis),
        or_na(&p.medication),
        p.dosage,
        or_na(&p.insurance_plan),
        or_na(&p.has_insurance),
        or_na(&p.smoking_status),
        comorbidities,
    )
}

fn render_patient(report: &AnalysisReport) -> String {
    let p = &report.patient_summary;
    let support = &report.decision_support;
    let cards = [
        card("Diagnosis", or_na(&p.diagnosis)),
        card("Risk level", or_na(&p.risk_level)),
        card("Care priority", or_na(&p.care_priority)),
        card("Blood pressure", or_na(&p.blood_pressure)),
    ]
    .concat();
    let vitals = [
        card("Heart rate", &vital(p.heart_rate, "bpm")),
        card("Cholesterol", &vital(p.cholesterol, "mg/dL")),
        card("Blood pressure", or_na(&p.blood_pressure)),
    ]
    .concat();

    format!(
        r#"<h1>{name}</h1>
<p class="muted">ID {id} &middot; Age {age} &middot; {gender} &middot; {decision}</p>
<div class="grid">{cards}</div>
<h2>Clinical case summary</h2>
<div class="card">{summary}</div>
<h2>Vitals</h2>
<div class="grid">{vitals}</div>
<h2>Risk rationale</h2>
{why}
<h2>EXPERT ANALYSIS</h2>
<div class="consult">{explanation}</div>
<h2>Evidence</h2>
{evidence}"#,
        name = escape_html(&p.patient_name),
        id = escape_html(&p.patient_id),
        age = p.age,
        gender = escape_html(or_na(&p.gender)),
        decision = escape_html(&support.decision),
        summary = escape_html(&case_summary(p)),
        why = list_items(&support.why, "No risk factors triggered."),
        explanation = escape_html(&support.llm_explanation),
        evidence = render_evidence(&report.pdf_evidence),
    )
}

fn render_records_table(records: &[PatientRecord]) -> String {
    if records.is_empty() {
        return r#"<p class="muted">No matching records.</p>"#.to_string();
    }
    let rows: String = records
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&r.patient_id),
                escape_html(&r.patient_name),
                r.age,
                escape_html(&r.gender),
                escape_html(&r.diagnosis),
                escape_html(&r.risk_level),
                escape_html(&r.insurance_plan),
            )
        })
        .collect();
    format!(
        "<table><thead><tr><th>ID</th><th>Name</th><th>Age</th><th>Gender</th>\
         <th>Diagnosis</th><th>Risk</th><th>Insurance</th></tr></thead><tbody>{rows}</tbody></table>"
    )
}

fn render_inquiry(report: &InquiryReport, session_id: &str) -> String {
    let summary = report
        .nlu_summary
        .as_deref()
        .map(|s| format!(r#"<p><strong>Interpreted as:</strong> {}</p>"#, escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<h1>Hospital intelligence brief</h1>
<p class="muted">Session {session} &middot; {sources} evidence passages &middot; {count} matching patients &middot; {mode}</p>
<p><strong>Question:</strong> {query}</p>
{summary}
<div class="consult">{explanation}</div>
<h2>Matched records</h2>
{table}
<h2>Patients</h2>
{names}
<h2>Evidence</h2>
{evidence}"#,
        session = escape_html(session_id),
        sources = report.pdf_evidence.total(),
        count = report.total_count,
        mode = escape_html(&report.display_mode),
        query = escape_html(&report.query),
        explanation = escape_html(&report.deep_explanation),
        table = render_records_table(&report.matched_records),
        names = list_items(&report.patient_names, "No patients matched."),
        evidence = render_evidence(&report.pdf_evidence),
    )
}
