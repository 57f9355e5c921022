//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use compass_core::pathway::{Milestone, MilestonePriority, MilestoneStatus, Pathway};
use compass_core::student::{Student, StudentPage};
use unicode_width::UnicodeWidthStr;

/// Print one page of students as a table.
pub fn print_students_table(page: &StudentPage) {
    if page.students.is_empty() {
        println!("{}", "No students found.".dimmed());
        return;
    }

    println!(
        "{:<36} {:<20} {:<8} {:<8} {:<12}",
        "ID", "Name", "Grade", "Class", "Number"
    );
    println!("{}", "─".repeat(88));

    for student in &page.students {
        println!(
            "{:<36} {} {:<8} {:<8} {:<12}",
            &student.id,
            pad_right(&truncate_visual(&student.basic_info.name, 20), 20),
            student.basic_info.grade,
            student.basic_info.class,
            student.basic_info.student_number.dimmed()
        );
    }

    println!();
    println!(
        "Page {}/{} {} {} student(s) total",
        page.pagination.page,
        page.pagination.pages.max(1),
        "·".dimmed(),
        page.pagination.total
    );
}

/// Print a single student in detail.
pub fn print_student(student: &Student) {
    println!(
        "{} {}",
        student.basic_info.name.cyan().bold(),
        format!("({})", student.basic_info.student_number).dimmed()
    );
    println!();
    println!(
        "{}: {} / {}",
        "Grade".bold(),
        student.basic_info.grade,
        student.basic_info.class
    );
    println!("{}: {:.2}", "GPA".bold(), student.academic_status.current_gpa);
    println!(
        "{}: {} ({})",
        "Target".bold(),
        student.target_universities.primary.name.yellow(),
        student.target_universities.primary.major
    );

    if !student.target_universities.alternatives.is_empty() {
        let names: Vec<&str> = student
            .target_universities
            .alternatives
            .iter()
            .map(|u| u.name.as_str())
            .collect();
        println!("{}: {}", "Alternatives".bold(), names.join(", ").dimmed());
    }

    if !student.academic_status.standardized_tests.is_empty() {
        println!();
        println!("{}", "Test Scores".bold());
        for test in &student.academic_status.standardized_tests {
            println!(
                "  {} {:?} {}",
                "●".cyan(),
                test.kind,
                test.date.format("%Y-%m-%d").to_string().dimmed()
            );
        }
    }

    if !student.related_teachers.is_empty() {
        println!();
        println!("{}", "Teachers".bold());
        for teacher in &student.related_teachers {
            println!(
                "  {} {} {}",
                "●".cyan(),
                teacher.teacher_id,
                format!("{:?}", teacher.role).to_lowercase().dimmed()
            );
        }
    }
}

/// Print a student's pathways as a table.
pub fn print_pathways_table(pathways: &[Pathway]) {
    if pathways.is_empty() {
        println!("{}", "No pathways found.".dimmed());
        return;
    }

    println!(
        "{:<36} {:<24} {:<10} {:>4} {:>5}",
        "ID", "Target", "Status", "Ver", "Prog"
    );
    println!("{}", "─".repeat(84));

    for pathway in pathways {
        println!(
            "{:<36} {} {:<10} {:>4} {:>4}%",
            &pathway.id,
            pad_right(&truncate_visual(&pathway.target_university.name, 24), 24),
            format!("{:?}", pathway.status).to_lowercase(),
            pathway.version,
            pathway.overall_progress()
        );
    }

    println!();
    println!("{} pathway(s) total", pathways.len());
}

/// Print a pathway with its milestone table and derived progress.
pub fn print_pathway(pathway: &Pathway) {
    let overall = pathway.overall_progress();

    println!(
        "{} {}",
        pathway.target_university.name.cyan().bold(),
        format!("({})", pathway.id).dimmed()
    );
    println!();
    println!(
        "{}: {}",
        "Status".bold(),
        format!("{:?}", pathway.status).to_lowercase().yellow()
    );
    println!("{}: v{}", "Version".bold(), pathway.version);
    println!(
        "{}: {} {}",
        "Progress".bold(),
        progress_bar(overall, 24),
        format!("{}%", overall).bold()
    );

    if pathway.milestones.is_empty() {
        println!();
        println!("{}", "No milestones.".dimmed());
        return;
    }

    println!();
    let title_w = title_width();
    println!(
        "{} {:<12} {:<4} {:>5}  {}",
        pad_right("Title", title_w),
        "Status",
        "Pri",
        "Prog",
        "Planned"
    );
    println!("{}", "─".repeat(title_w + 36));

    for milestone in &pathway.milestones {
        let status_pad = " ".repeat(12usize.saturating_sub(milestone.status.as_str().len()));
        println!(
            "{} {}{} {:<4} {:>4}%  {}",
            pad_right(&truncate_visual(&milestone.title, title_w), title_w),
            status_colored(milestone),
            status_pad,
            priority_indicator(milestone.priority),
            milestone.progress,
            milestone.planned_date.format("%Y-%m-%d").to_string().dimmed()
        );
    }

    if !pathway.adjustment_history.is_empty() {
        println!();
        println!(
            "{} ({})",
            "Adjustments".bold(),
            pathway.adjustment_history.len()
        );
        for adj in pathway.adjustment_history.iter().rev().take(5) {
            println!(
                "  {} {} {}",
                adj.date.format("%Y-%m-%d").to_string().dimmed(),
                adj.description,
                format!("by {}", adj.made_by).dimmed()
            );
        }
    }
}

fn status_colored(milestone: &Milestone) -> ColoredString {
    let label = milestone.status.as_str();
    match milestone.status {
        MilestoneStatus::Pending => label.normal(),
        MilestoneStatus::InProgress => label.yellow(),
        MilestoneStatus::Completed => label.green(),
        MilestoneStatus::Delayed => label.red(),
        MilestoneStatus::Cancelled => label.dimmed(),
    }
}

fn priority_indicator(priority: MilestonePriority) -> ColoredString {
    match priority {
        MilestonePriority::Critical => "!!".red().bold(),
        MilestonePriority::High => "! ".yellow(),
        MilestonePriority::Medium => "· ".dimmed(),
        MilestonePriority::Low => "  ".dimmed(),
    }
}

/// Simple bar: filled blocks proportional to percent.
fn progress_bar(percent: i64, width: usize) -> String {
    let filled = ((percent.clamp(0, 100) as usize) * width) / 100;
    format!(
        "{}{}",
        "█".repeat(filled).green(),
        "░".repeat(width - filled).dimmed()
    )
}

/// Milestone title column width, scaled to the terminal.
fn title_width() -> usize {
    let term = terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80);
    term.saturating_sub(40).clamp(20, 40)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
