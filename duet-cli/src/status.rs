use duet::client::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Join,
    Leave,
    Status,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Join => "Join call",
            MenuAction::Leave => "Leave call",
            MenuAction::Status => "Show status",
            MenuAction::Quit => "Quit",
        }
    }
}

/// Notices the relay going away after it has been up once.
#[derive(Debug, Default)]
pub struct RelayWatch {
    seen_open: bool,
}

impl RelayWatch {
    pub fn lost(&mut self, snapshot: &SessionSnapshot) -> bool {
        if snapshot.channel_open {
            self.seen_open = true;
            return false;
        }
        self.seen_open
    }
}

/// Join needs an open channel and no active call; leave needs a call.
pub fn menu_actions(snapshot: &SessionSnapshot) -> Vec<MenuAction> {
    let mut actions = Vec::with_capacity(4);
    if snapshot.channel_open && !snapshot.joined {
        actions.push(MenuAction::Join);
    }
    if snapshot.channel_open && snapshot.joined {
        actions.push(MenuAction::Leave);
    }
    actions.push(MenuAction::Status);
    actions.push(MenuAction::Quit);
    actions
}

pub fn render_status(snapshot: &SessionSnapshot) -> Vec<String> {
    vec![
        format!(
            "Relay: {}",
            if snapshot.channel_open { "connected" } else { "disconnected" }
        ),
        format!("Call: {}", snapshot.negotiation),
        format!("My delay to relay: {}", delay(snapshot.local_delay)),
        format!("Peer delay to relay: {}", delay(snapshot.remote_delay)),
        format!("Delay to peer: {}", delay(snapshot.pair_delay)),
        match snapshot.average_delay {
            Some(avg) => format!("Recent average delay: {avg:.1}ms"),
            None => "Recent average delay: pending".to_string(),
        },
    ]
}

fn delay(value: Option<f64>) -> String {
    match value {
        Some(ms) => format!("{ms}ms"),
        None => "pending".to_string(),
    }
}
