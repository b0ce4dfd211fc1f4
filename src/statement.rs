use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::{AccountRecord, FileRecord};

pub const REPORT_TITLE: &str = "Оборотная ведомость по балансовым счетам";
pub const REPORT_PERIOD: &str = "за период с 01.01.2016 по 31.12.2016";
pub const BY_BANK_LABEL: &str = "по банку:";
pub const AS_OF: &str = "1/1/2017 0:00:00";

/// Number of fixed rows above the first class section.
pub const HEADER_ROWS: usize = 5;

pub const COLUMN_HEADERS: [&str; 7] = [
    "Б/сч",
    "Входящее сальдо (Актив)",
    "Входящее сальдо (Пассив)",
    "Обороты (Дебет)",
    "Обороты (Кредит)",
    "Исходящее сальдо (Актив)",
    "Исходящее сальдо (Пассив)",
];

const CLASS_TOTAL_MARKER: &str = "ПО КЛАССУ";

static CLASS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}$").expect("class code pattern is valid")
});

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

pub struct AccountGroup<'a> {
    pub class: &'a str,
    pub accounts: Vec<&'a AccountRecord>,
}

/// Groups in first-seen order of their class.
pub type GroupedAccounts<'a> = Vec<AccountGroup<'a>>;

/// Bucket accounts by `account_class` in one left-to-right pass. Groups keep
/// the order in which their class first appears; accounts keep input order
/// within a group. Nothing is sorted or deduplicated.
pub fn group_by_class(accounts: &[AccountRecord]) -> GroupedAccounts<'_> {
    let mut groups: GroupedAccounts = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for account in accounts {
        let class = account.account_class.as_str();
        let slot = *index.entry(class).or_insert_with(|| {
            groups.push(AccountGroup {
                class,
                accounts: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].accounts.push(account);
    }
    groups
}

/// Class total lines ("... ПО КЛАССУ ...") and two-digit class header codes
/// get visual emphasis.
pub fn highlight_account_number(account_number: &str) -> bool {
    account_number.contains(CLASS_TOTAL_MARKER) || CLASS_CODE.is_match(account_number)
}

// ---------------------------------------------------------------------------
// Statement layout (shared by terminal views and the XLSX exporter)
// ---------------------------------------------------------------------------

pub fn header_lines(bank_name: &str) -> [String; HEADER_ROWS] {
    [
        format!("Название банка: {bank_name}"),
        REPORT_TITLE.to_string(),
        REPORT_PERIOD.to_string(),
        BY_BANK_LABEL.to_string(),
        format!("{AS_OF} в руб. {bank_name}"),
    ]
}

pub fn class_heading(class: &str) -> String {
    format!(" {class}")
}

#[derive(Debug, PartialEq)]
pub enum StatementRow<'a> {
    Header(String),
    ClassHeading(String),
    ColumnHeaders,
    Account {
        account: &'a AccountRecord,
        highlight: bool,
    },
}

/// Flatten one file into report rows: the five header lines, then for each
/// class a heading, the column header row and one row per account.
pub fn statement_rows(file: &FileRecord) -> Vec<StatementRow<'_>> {
    let mut rows: Vec<StatementRow> = header_lines(&file.bank_name)
        .into_iter()
        .map(StatementRow::Header)
        .collect();

    for group in group_by_class(&file.accounts) {
        rows.push(StatementRow::ClassHeading(class_heading(group.class)));
        rows.push(StatementRow::ColumnHeaders);
        for account in group.accounts {
            rows.push(StatementRow::Account {
                account,
                highlight: highlight_account_number(&account.account_number),
            });
        }
    }
    rows
}
