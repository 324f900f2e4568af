//! The standard colorectal pathology report field table.
//!
//! Order here is output order, and also the order in which unresolved
//! fields are handed to the model fallback.

use crate::patterns::{FieldDef, PatternDef};

/// All field declarations, in output order.
#[must_use]
pub fn standard_fields() -> Vec<FieldDef> {
    let mut fields = Vec::new();
    fields.extend(specimen_fields());
    fields.extend(tumor_fields());
    fields.extend(margin_fields());
    fields.extend(lymph_node_fields());
    fields.extend(invasion_fields());
    fields.extend(polyp_fields());
    fields.extend(staging_fields());
    fields.extend(findings_fields());
    fields.extend(report_fields());
    fields
}

/// Specimen identification and segment measurements.
fn specimen_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("Specimen Label", r"labeled as “([^”]+)”")
            .or_pattern(r#"labeled as "([^"]+)""#),
        FieldDef::new("Specimen Length", r"specimen.*?measures (\d+(\.\d+)? ?cm)"),
        FieldDef::new(
            "Colon Max Circumference",
            r"maximal circumference of the colon measures (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Terminal Ileum Max Circumference",
            r"maximal circumference of the terminal ileum measures (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Transverse Colon Max Circumference",
            r"transverse colon.*?maximal circumference.*?(\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Descending Colon Max Circumference",
            r"descending colon.*?maximal circumference.*?(\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Sigmoid Colon Max Circumference",
            r"sigmoid colon.*?maximal circumference.*?(\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new("Cecum Length", r"cecum.*?measuring (\d+(\.\d+)? ?cm)"),
        FieldDef::new(
            "Ascending Colon Length",
            r"ascending colon.*?measuring (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Transverse Colon Length",
            r"transverse colon.*?measuring (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Descending Colon Length",
            r"descending colon.*?measuring (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Sigmoid Colon Length",
            r"sigmoid colon.*?measuring (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Terminal Ileum Length",
            r"terminal ileum.*?measuring (\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new("Appendix Length", r"appendix.*?measuring (\d+(\.\d+)? ?cm)"),
        FieldDef::new("Appendix Diameter", r"appendix.*?diameter.*?(\d+(\.\d+)? ?cm)"),
    ]
}

/// Gross tumor description and surface status.
fn tumor_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new(
            "Tumor Size",
            r"measuring (\d+(\.\d+)? ?x ?\d+(\.\d+)? ?x ?\d+(\.\d+)? ?cm)",
        ),
        FieldDef::new(
            "Tumor Type",
            r"(adenocarcinoma|mucinous carcinoma|signet ring)",
        )
        .default_to("Adenocarcinoma"),
        FieldDef::new(
            "Tumor Appearance",
            r"appearance.*?, (friable|soft|firm|rubbery|necrotic|hemorrhagic)",
        ),
        FieldDef::new(
            "Tumor Color & Consistency",
            r"tumor.*?is (gray[\w\s]*|light brown|dark brown).+?(soft|rubbery|firm)",
        ),
        FieldDef::new("Tumor Location", r"located in the ([\w\s]+)[\.,]"),
        FieldDef::new(
            "Tumor Shape",
            r"(ulcerative|ulceroproliferative|polypoid) lesion",
        ),
        FieldDef::new(
            "Tumor Thickness",
            r"infiltrative tumor.*?measuring (\d+(\.\d+)? ?cm) in thickness",
        ),
        FieldDef::new(
            "Tumor Wall Side",
            r"circumference at (mesocolic|anti[- ]?mesocolic|posterior wall|anterior wall)",
        ),
        FieldDef::new(
            "Tumor Invasion Level",
            r"tumor.*?invad(?:es|ing).*?(into|through).*?(submucosa|muscularis propria|pericolic.*?|serosal surface|retroperitoneal surface)",
        ),
        FieldDef::new(
            "Serosal Surface Status",
            r"serosal.*?(smooth.*?|irregular.*?|perforated.*?)\.",
        ),
        FieldDef::new(
            "Retroperitoneal Surface Status",
            r"retroperitoneal.*?(smooth.*?|irregular.*?|perforated.*?)\.",
        ),
    ]
}

/// Margin widths and the tumor's distance from each margin.
fn margin_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("Margins Proximal", r"proximal margin.*?(\d+(\.\d+)? ?cm)"),
        FieldDef::new("Margins Distal", r"distal margin.*?(\d+(\.\d+)? ?cm)"),
        FieldDef::new("Margins Radial", r"radial margin.*?(\d+(\.\d+)? ?cm)"),
        FieldDef::new("Margins Mesenteric", r"mesenteric margin.*?(\d+(\.\d+)? ?cm)"),
        FieldDef::new(
            "Distance from Proximal Margin",
            r"located.*?(\d+(\.\d+)? ?cm) from (?:the )?proximal margin",
        ),
        FieldDef::new(
            "Distance from Distal Margin",
            r"(\d+(\.\d+)? ?cm) from (?:the )?distal margin",
        ),
        FieldDef::new(
            "Distance from Mesenteric Margin",
            r"(\d+(\.\d+)? ?cm) from mesenteric margin",
        ),
        FieldDef::new(
            "Distance from Retroperitoneal Margin",
            r"(\d+(\.\d+)? ?cm) from retroperitoneal margin",
        ),
    ]
}

fn lymph_node_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("Lymph Nodes Found", r"(\d+)\s+lymph nodes"),
        FieldDef::new("Positive Nodes", r"(\d+)\s+positive"),
        FieldDef::new("Nodes Examined", r"/\s*(\d+)\s+nodes"),
        FieldDef::new("Node Positions", r"(apical|pericolic|mesenteric)"),
        // No capture group: the value always comes from the presence check.
        FieldDef::new("Extranodal Extension", r"with extranodal extension").default_presence(
            "extranodal extension",
            "Yes",
            "No",
        ),
    ]
}

fn invasion_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new(
            "Lymphovascular Invasion",
            r"lymphovascular invasion.*?(present|absent)",
        ),
        FieldDef::new("Perineural Invasion", r"perineural invasion.*?(present|absent)"),
        FieldDef::new(
            "Extramural Vascular Invasion",
            r"extramural vascular invasion.*?(present|absent)",
        ),
        FieldDef::new("Tumor Budding", r"tumor budding.*?(present|absent)"),
    ]
}

fn polyp_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("Polyp Presence", r"(sessile|pedunculated) polyp"),
        FieldDef::new("Polyp Size", r"polyp.*?measuring (\d+(\.\d+)? ?cm)"),
        FieldDef::new(
            "Polyp Distance from Main Lesion",
            r"located (\d+(\.\d+)? ?cm) from (?:the )?(main lesion|proximal margin|distal margin)",
        ),
    ]
}

/// Pathologic TNM staging.
fn staging_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("pT Stage", r"(pT[0-9a-z]+)"),
        FieldDef::new("pN Stage", r"(pN[0-9a-z]+)"),
        FieldDef::new("pM Stage", r"(pM[0-9a-z]+)"),
    ]
}

fn findings_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new(
            "Distance to Serosa",
            r"distance.*?(serosa|peritoneal).*?(\d+(\.\d+)? ?mm)",
        ),
        FieldDef::new(
            "Synchronous Polyps",
            r"synchronous (lesions|polyps).*?(present|absent)",
        ),
        FieldDef::new(
            "Omentum Findings",
            r"omentum.*?(no grossly identifiable lesion|no nodule or mass|unremarkable|shows.*?)\.",
        ),
        // No capture group, so this always falls through to the sentinel.
        FieldDef::new(
            "Other Findings",
            r"ileum.*?unremarkable|appendix.*?unremarkable",
        ),
    ]
}

/// Report sign-off metadata and the free-text conclusion.
fn report_fields() -> Vec<FieldDef> {
    vec![
        FieldDef::new("Pathologist", r"Pathologist\s*:\s*(Dr\.\s*\w+.*)"),
        FieldDef::new(
            "Diagnosis Date",
            r"Date\s*of\s*Diagnosis\s*:\s*(\d{1,2}/\d{1,2}/\d{2,4})",
        ),
        FieldDef::new("Block Count", r"Total\s*blocks\s*taken\s*:\s*(\d+)"),
        FieldDef::with_pattern(
            "Report Conclusion",
            PatternDef::new(r"(Final diagnosis[:\s].+)").spanning_lines(),
        )
        .default_to(""),
    ]
}
