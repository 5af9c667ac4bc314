//! Canned content for the `showcase` screen: the commands cycled in the
//! header, the output shown for each of them, and the tabbed demos.

/// Commands typed and deleted in the header.
pub const COMMANDS: [&str; 5] = [
    "ellie git commit",
    "ellie todo add \"Fix login bug\"",
    "ellie switch api",
    "ellie start-day",
    "ellie network-status",
];

/// How often the output panel catches up with the header, in milliseconds.
pub const OUTPUT_REFRESH_MS: u64 = 4000;
/// Header timing.
pub const HEADER_TYPING_MS: i64 = 100;
pub const HEADER_DELETING_MS: i64 = 50;
pub const HEADER_PAUSE_MS: i64 = 2000;
pub const HEADER_START_DELAY_MS: i64 = 1000;
/// The first demo is revealed a little faster, after a short delay.
pub const INITIAL_DEMO_DELAY_MS: i64 = 15;
pub const INITIAL_DEMO_START_MS: i64 = 500;
/// Per-character delay when switching tabs.
pub const TAB_DEMO_DELAY_MS: i64 = 20;

/// Output printed by each of [`COMMANDS`], in the same order.
const COMMAND_OUTPUTS: [&str; 5] = [
    "📝 Conventional Commit Builder\n\
     ─────────────────────────────\n\
     🔧 Type: feat\n\
     🎯 Scope: auth\n\
     📌 Description: Add OAuth2 support\n\
     ✅ Successfully committed and pushed!",
    "✅ Added todo #1: Fix login bug",
    "✅ Switched to project 'api'\n\
     📂 /Users/dev/projects/api\n\
     🔧 Starting development server...",
    "🌅 Starting your development day...\n\
     ✅ Opening applications...\n\
     ✅ Starting services...\n\
     ✅ Checking Git repositories...\n\
     🚀 Your development environment is ready!",
    "🌐 Network Status\n\
     ─────────────────\n\
     📡 WiFi: Connected\n\
     🌍 Internet: Active\n\
     ⚡ Speed: 150 Mbps\n\
     📍 IP: 192.168.1.100",
];

/// Output printed by the command at `index` in [`COMMANDS`].
pub fn command_output(index: usize) -> Option<&'static str> {
    COMMAND_OUTPUTS.get(index).copied()
}

/// A tab of the demo panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoTab {
    Git,
    Todo,
    Projects,
}

impl DemoTab {
    pub const ALL: [DemoTab; 3] = [DemoTab::Git, DemoTab::Todo, DemoTab::Projects];

    pub fn title(self) -> &'static str {
        match self {
            DemoTab::Git => "git",
            DemoTab::Todo => "todo",
            DemoTab::Projects => "projects",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DemoTab::Git => 0,
            DemoTab::Todo => 1,
            DemoTab::Projects => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<DemoTab> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> DemoTab {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> DemoTab {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The transcript revealed when the tab is selected.
    pub fn transcript(self) -> &'static str {
        match self {
            DemoTab::Git => GIT_DEMO,
            DemoTab::Todo => TODO_DEMO,
            DemoTab::Projects => PROJECTS_DEMO,
        }
    }
}

const GIT_DEMO: &str = "$ ellie git commit
📝 Conventional Commit Builder
─────────────────────────────
🔧 Type (feat, fix, docs, style, refactor, perf, test, chore, revert) ➜ feat
🎯 Scope (optional) ➜ auth
📌 Description ➜ Add OAuth2 support
💬 Body (optional):
◎ Press Enter twice to finish:
Implemented Google and GitHub providers
Updated configuration schema

💥 Breaking change? (Y/n) ➜ y
📣 Breaking change details ➜ Changed config format
🔗 Issue number (optional) ➜ 42

✨ Commit Preview:
──────────────────
feat(auth): Add OAuth2 support

Implemented Google and GitHub providers
Updated configuration schema

BREAKING CHANGE: Changed config format

Refs #42
──────────────────
✅ Successfully committed and pushed!";

const TODO_DEMO: &str = "$ ellie todo add \"Fix login bug\" api high
✅ Added todo #1: Fix login bug [api] 🔴 High

$ ellie todo list
Your todos:
📁 api:
  ❌ #1: Fix login bug 🔴 High
  ✅ #2: Update docs 🟡 Medium
📁 frontend:
  ❌ #3: Responsive design 🟢 Low

$ ellie todo complete 1
✅ Completed todo #1: Fix login bug";

const PROJECTS_DEMO: &str = "$ ellie project add api ~/projects/api \"API Service\" backend,nodejs
✅ Added project 'api'

$ ellie project list
📁 api
   📝 API Service
   📂 /Users/me/projects/api
   🏷️  backend, nodejs
   ⏰ Last used: 2 hours ago

📁 frontend
   📝 React Dashboard
   📂 /Users/me/projects/dashboard
   🏷️  frontend, react
   ⏰ Last used: 1 day ago

$ ellie switch api
✅ Switched to project 'api'
📂 /Users/me/projects/api
🔧 Starting development server...";
