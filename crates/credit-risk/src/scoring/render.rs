use super::domain::Verdict;

/// HTML fragment written into the form's output region.
pub fn verdict_html(verdict: &Verdict) -> String {
    match verdict {
        Verdict::HighRisk {
            rejection_probability,
        } => format!(
            "<div class='reject'>❌ <b>High Risk</b><br>Rejection Probability: {rejection_probability:.2}</div>"
        ),
        Verdict::LowRisk {
            displayed_probability,
        } => format!(
            "<div class='approve'>✅ <b>Low Risk</b><br>Approval Probability: {displayed_probability:.2}</div>"
        ),
        Verdict::Warning { issue } => {
            format!("<div class='warn'>⚠️ {}</div>", issue.message())
        }
    }
}

const STYLESHEET: &str = r#"
body {
    background: linear-gradient(135deg, #f8fbff, #eef3f9);
}

.container {
    max-width: 780px;
    margin: auto;
    background: white;
    padding: 28px;
    border-radius: 16px;
    box-shadow: 0 12px 30px rgba(0,0,0,0.08);
    font-family: 'Segoe UI', sans-serif;
}

.container label {
    display: block;
    margin-top: 12px;
    font-weight: 600;
}

.container input, .container select {
    width: 100%;
    padding: 8px;
    border: 1px solid #d5dde8;
    border-radius: 8px;
}

.container button {
    margin: 20px 0;
    width: 100%;
    padding: 12px;
    border: none;
    border-radius: 10px;
    background: #2e86de;
    color: white;
    font-size: 16px;
    cursor: pointer;
}

.approve {
    background: #eafaf1;
    color: #1e8449;
    padding: 16px;
    border-radius: 10px;
    text-align: center;
    font-size: 18px;
}

.reject {
    background: #fdecea;
    color: #922b21;
    padding: 16px;
    border-radius: 10px;
    text-align: center;
    font-size: 18px;
}

.warn {
    background: #fff3cd;
    color: #7d6608;
    padding: 14px;
    border-radius: 10px;
    text-align: center;
    font-weight: 600;
}
"#;

enum Input {
    Number,
    Choice(&'static [&'static str]),
}

/// Form fields in submission order: `(json key, label, input)`.
const FIELDS: [(&str, &str, Input); 11] = [
    ("dependents", "No of Dependents", Input::Number),
    (
        "education",
        "Education",
        Input::Choice(&["Graduate", "Not Graduate"]),
    ),
    ("self_employed", "Self Employed", Input::Choice(&["Yes", "No"])),
    ("annual_income", "Annual Income", Input::Number),
    ("loan_amount", "Loan Amount", Input::Number),
    ("loan_term_months", "Loan Term (Months)", Input::Number),
    ("cibil_score", "CIBIL Score", Input::Number),
    (
        "residential_assets_value",
        "Residential Assets Value",
        Input::Number,
    ),
    (
        "commercial_assets_value",
        "Commercial Assets Value",
        Input::Number,
    ),
    ("luxury_assets_value", "Luxury Assets Value", Input::Number),
    ("bank_asset_value", "Bank Asset Value", Input::Number),
];

const SUBMIT_SCRIPT: &str = r#"
document.getElementById('risk-form').addEventListener('submit', async (event) => {
    event.preventDefault();
    const payload = {};
    for (const field of event.target.elements) {
        if (!field.name) continue;
        if (field.type === 'number') {
            payload[field.name] = field.value === '' ? null : Number(field.value);
        } else {
            payload[field.name] = field.value === '' ? null : field.value;
        }
    }
    const output = document.getElementById('output');
    const response = await fetch('/api/v1/risk/score', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
    });
    const isJson = (response.headers.get('Content-Type') || '').includes('application/json');
    if (response.ok && isJson) {
        output.innerHTML = (await response.json()).html;
        return;
    }
    const reason = isJson
        ? (await response.json()).error
        : await response.text();
    output.innerHTML = "<div class='warn'>⚠️ " + (reason || 'Unable to score application') + "</div>";
});
"#;

/// Full single-page form served at the site root.
pub fn form_page() -> String {
    let mut fields = String::new();
    for (name, label, input) in &FIELDS {
        fields.push_str(&format!("<label for='{name}'>{label}</label>\n"));
        match input {
            Input::Number => fields.push_str(&format!(
                "<input type='number' step='any' id='{name}' name='{name}'>\n"
            )),
            Input::Choice(options) => {
                fields.push_str(&format!("<select id='{name}' name='{name}'>\n"));
                fields.push_str("<option value=''></option>\n");
                for option in options.iter() {
                    fields.push_str(&format!("<option value='{option}'>{option}</option>\n"));
                }
                fields.push_str("</select>\n");
            }
        }
    }

    format!(
        "<!DOCTYPE html>
<html lang='en'>
<head>
<meta charset='utf-8'>
<title>Credit Risk Prediction System</title>
<style>{STYLESHEET}</style>
</head>
<body>
<h1 style='text-align:center;'>Credit Risk Prediction System</h1>
<p style='text-align:center;'>Soft UI with validation &amp; risk-based decisioning</p>
<div class='container'>
<form id='risk-form'>
{fields}<button type='submit'>Check Loan Risk</button>
</form>
<div id='output'></div>
</div>
<script>{SUBMIT_SCRIPT}</script>
</body>
</html>
"
    )
}
