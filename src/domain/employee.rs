//! Employees and their skills, as reported by the employee information API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wire;

/// Envelope of the employee list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDirectory {
    /// All employees.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub employees: Vec<Employee>,
    /// Whether the upstream directory is currently re-synchronising.
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_syncing: bool,
    /// When the directory was last synchronised.
    #[serde(default, deserialize_with = "wire::optional_timestamp")]
    pub last_sync_date: Option<DateTime<Utc>>,
}

/// An employee record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    /// Directory id.
    #[serde(default, deserialize_with = "wire::optional_id")]
    pub id: Option<String>,
    /// Employee code, the key the list view filters on.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub emp_code: String,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Work location.
    #[serde(default)]
    pub location: Option<String>,
    /// Office.
    #[serde(default)]
    pub office: Option<String>,
    /// Contract level and position, when known.
    #[serde(default)]
    pub contract_info: Option<ContractInfo>,
    /// Main skills.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub skills: Vec<EmployeeSkill>,
    /// Secondary skills.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub additional_skills: Vec<EmployeeAdditionalSkill>,
    /// Business domains the employee has worked in.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub business_domains: Vec<BusinessDomain>,
}

impl Employee {
    /// The `Level - Position` label, or `-/-` without contract information.
    #[must_use]
    pub fn position_label(&self) -> String {
        self.contract_info.as_ref().map_or_else(
            || "-/-".to_string(),
            |info| format!("{} - {}", info.level_name, info.position_name),
        )
    }
}

/// Contract details of an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInfo {
    /// Seniority level.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub level_name: String,
    /// Position title.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub position_name: String,
}

/// A main skill of an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSkill {
    /// Skill name.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub skill_name: String,
    /// Proficiency label.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub proficiency_name: String,
    /// Whether this is the employee's primary skill.
    #[serde(default, deserialize_with = "wire::flag")]
    pub is_primary: bool,
    /// Months of experience with the skill.
    #[serde(default)]
    pub month_of_experience: u32,
}

/// A secondary skill of an employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeAdditionalSkill {
    /// Skill name.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub additional_skill_name: String,
    /// Proficiency label.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub proficiency_name: String,
}

/// A business domain an employee has experience in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessDomain {
    /// Domain name.
    #[serde(default, deserialize_with = "wire::null_as_default")]
    pub business_domain_name: String,
}

/// Returns the employees whose code contains `term`, ignoring case.
///
/// An empty term matches every employee. Order is preserved.
#[must_use]
pub fn filter_by_code<'a>(employees: &'a [Employee], term: &str) -> Vec<&'a Employee> {
    positions_by_code(employees, term)
        .into_iter()
        .map(|index| &employees[index])
        .collect()
}

/// Like [`filter_by_code`], but returns positions into `employees`.
#[must_use]
pub fn positions_by_code(employees: &[Employee], term: &str) -> Vec<usize> {
    let needle = term.to_lowercase();
    employees
        .iter()
        .enumerate()
        .filter(|(_, employee)| employee.emp_code.to_lowercase().contains(&needle))
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn employee(code: &str) -> Employee {
        Employee {
            emp_code: code.to_string(),
            ..Employee::default()
        }
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let employees = vec![employee("E001"), employee("E002"), employee("X001")];

        let codes: Vec<_> = filter_by_code(&employees, "e0")
            .into_iter()
            .map(|employee| employee.emp_code.as_str())
            .collect();

        assert_eq!(codes, ["E001", "E002"]);
    }

    #[test]
    fn empty_term_matches_everyone() {
        let employees = vec![employee("E001"), employee("X001")];
        assert_eq!(filter_by_code(&employees, "").len(), 2);
    }

    #[test]
    fn position_label_falls_back() {
        let mut employee = employee("E001");
        assert_eq!(employee.position_label(), "-/-");

        employee.contract_info = Some(ContractInfo {
            level_name: "Senior".to_string(),
            position_name: "Developer".to_string(),
        });
        assert_eq!(employee.position_label(), "Senior - Developer");
    }

    #[test]
    fn directory_from_api_payload() {
        let directory: EmployeeDirectory = serde_json::from_value(json!({
            "employees": [{
                "id": 3,
                "empCode": "E003",
                "contractInfo": null,
                "skills": [
                    { "skillName": "Rust", "proficiencyName": "Expert", "isPrimary": true }
                ],
                "additionalSkills": [
                    { "additionalSkillName": "SQL", "proficiencyName": "Good" }
                ],
                "businessDomains": [{ "businessDomainName": "Retail" }]
            }],
            "isSyncing": false,
            "lastSyncDate": "2025-03-01T00:00:00Z"
        }))
        .unwrap();

        let employee = &directory.employees[0];
        assert_eq!(employee.id.as_deref(), Some("3"));
        assert!(employee.skills[0].is_primary);
        assert_eq!(employee.additional_skills[0].additional_skill_name, "SQL");
        assert!(directory.last_sync_date.is_some());
    }
}
