//! Poll rendering.

use maud::{Markup, html};
use tootfeed_core::Poll;

use super::components::format_timestamp;

/// Render a poll: one row per option, then voters and expiry.
///
/// Every option tied for the highest count gets the `poll-max` class. A poll
/// with no votes marks nothing.
pub fn render_poll(poll: &Poll) -> Markup {
    let total = poll.votes_count;
    let max = poll
        .options
        .iter()
        .filter_map(|o| o.votes_count)
        .max()
        .unwrap_or(0);

    html! {
        div class="toot-poll" {
            @for option in &poll.options {
                @let votes = option.votes_count;
                @let is_max = max > 0 && votes == Some(max);
                div.poll-option.poll-max[is_max] {
                    @if let Some(votes) = votes {
                        span class="poll-bar" style={ "width:" (percent(votes, total)) "%" } {}
                    }
                    span class="poll-title" { (option.title) }
                    @if let Some(votes) = votes {
                        span class="poll-votes" { (votes) "/" (total) }
                    }
                }
            }
            div class="poll-footer" {
                @if poll.multiple {
                    @if let Some(voters) = poll.voters_count {
                        span class="poll-voters" { (voters) " voters" }
                    }
                }
                @if poll.expired {
                    " "
                    span class="poll-expiry expired" {
                        "closed"
                        @if let Some(at) = &poll.expires_at { " " (format_timestamp(at)) }
                    }
                } @else if let Some(at) = &poll.expires_at {
                    " "
                    span class="poll-expiry" { "closes " (format_timestamp(at)) }
                }
            }
        }
    }
}

/// Whole-number share of `total`, rounded half up and capped at 100.
/// Zero when nobody voted.
fn percent(votes: u64, total: u64) -> u64 {
    if total == 0 {
        return 0;
    }
    let (votes, total) = (u128::from(votes), u128::from(total));
    let share = (votes * 100 + total / 2) / total;
    u64::try_from(share.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poll(value: serde_json::Value) -> Poll {
        serde_json::from_value(value).unwrap()
    }

    fn two_options(a: u64, b: u64) -> Poll {
        poll(serde_json::json!({
            "options": [
                {"title": "A", "votes_count": a},
                {"title": "B", "votes_count": b}
            ],
            "votes_count": a + b,
            "multiple": false,
            "expired": false
        }))
    }

    #[test]
    fn marks_maximum_and_shows_fractions() {
        let html = render_poll(&two_options(3, 7)).into_string();
        assert!(html.contains("3/10"));
        assert!(html.contains("7/10"));
        assert_eq!(html.matches("poll-max").count(), 1);
        let max_at = html.find("poll-max").unwrap();
        let b_at = html.find(">B<").unwrap();
        let a_at = html.find(">A<").unwrap();
        assert!(a_at < max_at && max_at < b_at);
    }

    #[test]
    fn ties_mark_every_maximum() {
        let html = render_poll(&two_options(5, 5)).into_string();
        assert_eq!(html.matches("poll-max").count(), 2);
    }

    #[test]
    fn zero_votes_marks_nothing() {
        let html = render_poll(&two_options(0, 0)).into_string();
        assert!(!html.contains("poll-max"));
        assert!(html.contains("0/0"));
        assert!(html.contains("width:0%"));
    }

    #[test]
    fn bar_width_is_percentage() {
        let html = render_poll(&two_options(1, 2)).into_string();
        assert!(html.contains("width:33%"));
        assert!(html.contains("width:67%"));
    }

    #[test]
    fn hidden_counts_render_titles_only() {
        let html = render_poll(&poll(serde_json::json!({
            "options": [{"title": "A", "votes_count": null}],
            "votes_count": 0
        })))
        .into_string();
        assert!(html.contains(">A<"));
        assert!(!html.contains("poll-votes"));
    }

    #[test]
    fn voters_only_for_multiple_choice() {
        let mut p = two_options(3, 7);
        p.voters_count = Some(8);
        assert!(!render_poll(&p).into_string().contains("8 voters"));
        p.multiple = true;
        assert!(render_poll(&p).into_string().contains("8 voters"));
    }

    #[test]
    fn expiry_states() {
        let mut p = two_options(1, 1);
        p.expires_at = Some("2024-06-01T12:00:00Z".parse().unwrap());
        let open = render_poll(&p).into_string();
        assert!(open.contains("closes 2024-06-01 12:00"));
        assert!(!open.contains("expired"));

        p.expired = true;
        let closed = render_poll(&p).into_string();
        assert!(closed.contains(r#"class="poll-expiry expired""#));
        assert!(closed.contains("closed 2024-06-01 12:00"));
    }

    #[test]
    fn percent_rounds() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(5, 0), 0);
    }

    #[test]
    fn percent_survives_huge_and_inconsistent_counts() {
        assert_eq!(percent(u64::MAX, u64::MAX), 100);
        assert_eq!(percent(u64::MAX / 2, u64::MAX), 50);
        assert_eq!(percent(12, 3), 100);
    }

    #[test]
    fn huge_vote_counts_render() {
        let html = render_poll(&poll(serde_json::json!({
            "options": [{"title": "A", "votes_count": u64::MAX}],
            "votes_count": u64::MAX
        })))
        .into_string();
        assert!(html.contains("width:100%"));
        assert!(html.contains("poll-max"));
    }

    #[test]
    fn option_above_total_is_capped() {
        let html = render_poll(&poll(serde_json::json!({
            "options": [{"title": "A", "votes_count": 9}],
            "votes_count": 3
        })))
        .into_string();
        assert!(html.contains("width:100%"));
    }
}
