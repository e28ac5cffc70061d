use crate::models::Member;
use crate::wizard::terms::format_cents;

/// Euro display string for a cent amount.
pub fn euros(cents: i64) -> String {
    format!("{} EUR", format_cents(cents))
}

pub fn print_member_row(member: &Member) {
    let state = if member.archived {
        "archived"
    } else if member.active {
        "active"
    } else {
        "inactive"
    };
    println!(
        "{:<38} {:<30} {:<12} {}",
        member.id,
        member.full_name(),
        member.birthdate,
        state
    );
}

pub fn print_member_header() {
    println!(
        "{:<38} {:<30} {:<12} {}",
        "ID", "Name", "Birthdate", "State"
    );
}
