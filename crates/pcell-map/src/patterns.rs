//! Static header vocabularies used by the field map.

use pcell_model::FieldKey;

/// Spreadsheet header spellings for built-in fields, pre-normalized.
///
/// Entries never override a mapping derived from the column layout.
pub const ALIASES: &[(&str, FieldKey)] = &[
    // student
    ("name", FieldKey::StudentName),
    ("studname", FieldKey::StudentName),
    ("nameofthestudent", FieldKey::StudentName),
    ("nameofstudent", FieldKey::StudentName),
    ("candidatename", FieldKey::StudentName),
    ("candidate", FieldKey::StudentName),
    ("registerno", FieldKey::StudentId),
    ("registernumber", FieldKey::StudentId),
    ("regno", FieldKey::StudentId),
    ("usn", FieldKey::StudentId),
    ("rollno", FieldKey::StudentId),
    ("rollnumber", FieldKey::StudentId),
    ("enrollmentno", FieldKey::StudentId),
    ("mobile", FieldKey::StudentMobile),
    ("mobileno", FieldKey::StudentMobile),
    ("mobilenumber", FieldKey::StudentMobile),
    ("phone", FieldKey::StudentMobile),
    ("phoneno", FieldKey::StudentMobile),
    ("contact", FieldKey::StudentMobile),
    ("contactno", FieldKey::StudentMobile),
    ("contactnumber", FieldKey::StudentMobile),
    ("email", FieldKey::StudentMail),
    ("emailid", FieldKey::StudentMail),
    ("mail", FieldKey::StudentMail),
    ("mailid", FieldKey::StudentMail),
    ("address", FieldKey::StudentAddress),
    ("dept", FieldKey::Department),
    ("branch", FieldKey::Department),
    ("stream", FieldKey::Department),
    ("year", FieldKey::CurrentYear),
    ("batch", FieldKey::CurrentYear),
    ("passingyear", FieldKey::CurrentYear),
    ("sem", FieldKey::Semester),
    // company
    ("company", FieldKey::CompanyName),
    ("nameofthecompany", FieldKey::CompanyName),
    ("nameofcompany", FieldKey::CompanyName),
    ("organization", FieldKey::CompanyName),
    ("organisation", FieldKey::CompanyName),
    ("employer", FieldKey::CompanyName),
    ("recruiter", FieldKey::CompanyName),
    ("companyemail", FieldKey::CompanyMail),
    ("companymailid", FieldKey::CompanyMail),
    ("officeaddress", FieldKey::CompanyAddress),
    ("location", FieldKey::CompanyAddress),
    ("hr", FieldKey::HrName),
    ("contactperson", FieldKey::HrName),
    ("hremail", FieldKey::HrMail),
    ("hrmailid", FieldKey::HrMail),
    // offer
    ("ctc", FieldKey::PackageLpa),
    ("lpa", FieldKey::PackageLpa),
    ("package", FieldKey::PackageLpa),
    ("salarypackage", FieldKey::PackageLpa),
    ("stipend", FieldKey::Salary),
    ("pay", FieldKey::Salary),
    ("offer", FieldKey::OfferType),
    ("type", FieldKey::OfferType),
    ("visittype", FieldKey::OfferType),
    ("mode", FieldKey::OfferType),
    ("dateofjoining", FieldKey::JoinDate),
    ("joiningdate", FieldKey::JoinDate),
    ("doj", FieldKey::JoinDate),
    ("date", FieldKey::JoinDate),
    ("referenceno", FieldKey::RefNo),
    ("referencenumber", FieldKey::RefNo),
    ("offerletterno", FieldKey::RefNo),
];

/// Spellings that mean company fields on a company master sheet, where a
/// bare "Name" or "Email" describes the company rather than a student.
pub const MASTER_COMPANY_ALIASES: &[(&str, FieldKey)] = &[
    ("name", FieldKey::CompanyName),
    ("companyname", FieldKey::CompanyName),
    ("email", FieldKey::CompanyMail),
    ("emailid", FieldKey::CompanyMail),
    ("mail", FieldKey::CompanyMail),
    ("address", FieldKey::CompanyAddress),
    ("hrname", FieldKey::HrName),
    ("hrmail", FieldKey::HrMail),
];

/// Serial-number columns carried by most hand-made sheets.
pub const NOISE_HEADERS: &[&str] = &["sno", "slno", "srno", "serialno", "serialnumber", "sn", "no"];

/// Lowercase phrases that mark a title or section banner row.
pub const BANNER_PHRASES: &[&str] = &[
    "placement details",
    "placement record",
    "placement report",
    "placement list",
    "placement statistics",
    "placed students",
    "list of",
    "summary",
    "total",
    "academic year",
];

/// Normalized words that mark a clipboard header row.
pub const HEADER_KEYWORDS: &[&str] = &[
    "name", "company", "salary", "student", "department", "dept", "package", "ctc", "lpa",
    "mobile", "mail", "email", "offer", "usn", "register", "roll", "semester", "year",
];

pub fn is_noise_header(normalized: &str) -> bool {
    NOISE_HEADERS.contains(&normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcell_model::normalize_key;

    #[test]
    fn aliases_are_normalized() {
        for (alias, _) in ALIASES {
            assert_eq!(&normalize_key(alias), alias);
        }
    }

    #[test]
    fn aliases_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for (alias, _) in ALIASES {
            assert!(seen.insert(*alias), "duplicate alias {alias}");
        }
    }
}
