//! Livepen Studio - Desktop playground for HTML, CSS and JavaScript

mod editor;
mod js_interop;
mod modals;
mod notifications;
mod preview;
mod settings;
mod split;
mod state;
mod statusbar;
mod toolbar;

use clap::Parser;
use dioxus::desktop::{Config, WindowBuilder};
use dioxus::prelude::*;
use state::{AppState, INITIAL_RENDER_DELAY};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Clone)]
#[command(name = "livepen-studio")]
#[command(about = "Live HTML/CSS/JS playground", long_about = None)]
#[command(version)]
struct Cli {
    /// Share link or bare share code to open
    share: Option<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    // Remove native window decorations - we'll create our own title bar
    let window = WindowBuilder::new()
        .with_title("Livepen Studio")
        .with_decorations(false);

    let config = Config::new().with_window(window);

    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .with_context(cli)
        .launch(App);
}

#[component]
fn App() -> Element {
    let cli = use_context::<Cli>();

    // Global app state - shared code from the command line, else offer a restore
    use_context_provider(|| {
        let state = AppState::startup(
            settings::load_settings(),
            state::open_store(),
            cli.share.as_deref(),
            chrono::Utc::now(),
        );
        Signal::new(state)
    });

    let mut state = use_context::<Signal<AppState>>();

    // First render shortly after startup
    use_effect(move || {
        spawn(async move {
            tokio::time::sleep(INITIAL_RENDER_DELAY).await;
            preview::run_preview(state);
        });
    });

    // Auto-save on a fixed interval
    use_effect(move || {
        spawn(async move {
            loop {
                let interval = state.peek().settings.autosave_interval();
                tokio::time::sleep(interval).await;
                state.write().autosave(chrono::Utc::now());
            }
        });
    });

    // Touch devices get larger text, a one-time hint and no double-tap zoom
    use_effect(move || {
        spawn(async move {
            if js_interop::detect_touch().await {
                js_interop::install_touch_guards().await;
                state.write().enable_touch_mode();
            }
        });
    });

    // Online / offline notices
    use_effect(move || {
        spawn(async move {
            let mut connectivity = js_interop::watch_connectivity();
            while let Ok(online) = connectivity.recv::<bool>().await {
                state.write().set_online(online);
            }
        });
    });

    let (theme_class, touch_class, touch_hint) = {
        let s = state.read();
        (
            s.settings.theme.class(),
            if s.touch_mode { "touch" } else { "" },
            s.touch_hint_visible,
        )
    };

    rsx! {
        style { {include_str!("../assets/style.css")} }

        // Native scroll sync - keeps line numbers aligned without Rust async overhead
        script {
            dangerous_inner_html: "
                document.addEventListener('scroll', function(e) {{
                    if (!e.target.classList || !e.target.classList.contains('code-input')) return;

                    var editor = e.target;
                    var fragment = editor.id.replace('editor-', '');
                    var lineNumbers = document.getElementById('line-numbers-' + fragment);

                    if (lineNumbers) {{
                        lineNumbers.scrollTop = editor.scrollTop;
                    }}
                }}, true);
            "
        }

        div { class: "app-container {theme_class} {touch_class}",
            // Top toolbar
            toolbar::Toolbar {}

            // Editor | preview
            div { class: "main-content",
                split::SplitView {}
            }

            // Status bar
            statusbar::StatusBar {}

            modals::ModalHost {}
            notifications::NotificationStack {}
            if touch_hint {
                notifications::TouchHint {}
            }
        }
    }
}
