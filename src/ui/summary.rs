use crate::core::projector::Projection;
use crate::core::session::Summary;
use crate::utils::colors::{CYAN, GREEN, RESET, YELLOW};
use crate::utils::date::long_date;
use crate::utils::format_hours;

pub fn render_summary(s: &Summary, cap: f64) -> String {
    let mut out = String::new();

    let who = s.email.as_deref().unwrap_or("guest");
    out.push_str(&format!("👤 {}\n\n", who));

    out.push_str(&format!(
        "{CYAN}• Hours in system:{RESET} {}\n",
        format_hours(s.in_system_hours)
    ));
    out.push_str(&format!(
        "{CYAN}• Previous hours:{RESET}  {}\n",
        format_hours(s.previous_hours)
    ));
    out.push_str(&format!(
        "{CYAN}• Total:{RESET}           {} / {}\n",
        format_hours(s.total_hours),
        format_hours(s.goal_hours)
    ));
    out.push_str(&format!("{CYAN}• Days recorded:{RESET}   {}\n", s.recorded_days));

    let pct = if s.goal_hours > 0.0 {
        (s.total_hours / s.goal_hours * 100.0).min(100.0)
    } else {
        100.0
    };
    out.push_str(&format!("{CYAN}• Progress:{RESET}        {:.1}%\n\n", pct));

    match s.projection {
        Projection::Completed => {
            out.push_str(&format!("{GREEN}🎉 Goal completed!{RESET}\n"));
        }
        Projection::Forecast { date, days_needed } => {
            out.push_str(&format!(
                "{YELLOW}🏁 Expected completion: {}{RESET} ({} working days at {}h/day)\n",
                long_date(date),
                days_needed,
                format_hours(cap)
            ));
        }
    }

    out
}
