// ============================================================================
// LazyHistory - Visualiseur d'historique des transactions serveur
// ============================================================================
// Programme TUI qui charge l'historique des transactions depuis l'API du
// serveur de paiement et l'affiche dans une liste navigable
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle infinie qui gère événements et rendering
// 3. Async dans sync : tokio::runtime::Runtime dans le worker thread
// 4. RAII : restauration du terminal même en cas d'erreur
// ============================================================================

use std::io;
use std::sync::{mpsc, Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use lazyhistory::api::{ServerApi, TransactionSource};
use lazyhistory::app::App;
use lazyhistory::controller::HistoryController;
use lazyhistory::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand : Commandes pour le worker thread
// ============================================================================
// CONCEPT RUST : Command pattern avec channels
// - L'event loop envoie des commandes au worker thread
// - Le worker thread exécute les tâches async (fetch API)
// - Communication via mpsc channel (multi-producer, single-consumer)
// ============================================================================

/// Commandes envoyées au worker thread pour exécuter des tâches async
#[derive(Debug, Clone)]
enum AppCommand {
    /// (Re)charger l'historique des transactions depuis le serveur
    ///
    /// Envoyée une fois au démarrage (chargement initial déclenché par
    /// la construction du contrôleur) puis à chaque pression de 'r'.
    /// Pas de déduplication : chaque commande résout indépendamment et
    /// écrase la liste du view model.
    LoadHistory,
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// CONCEPT RUST : Tracing subscriber
/// - Registry : point central des logs
/// - Layer : transforme et route les logs
/// - EnvFilter : filtre par niveau (RUST_LOG env var)
/// - RollingFileAppender : rotation automatique
///
/// Les logs sont écrits dans :
/// - Linux/WSL : ~/.local/share/lazyhistory/logs/lazyhistory.log
/// - macOS : ~/Library/Application Support/lazyhistory/logs/lazyhistory.log
///
/// # Utilisation
/// ```bash
/// # Voir les logs en temps réel
/// tail -f ~/.local/share/lazyhistory/logs/lazyhistory.log
///
/// # Contrôler le niveau de log
/// RUST_LOG=debug cargo run
/// RUST_LOG=lazyhistory=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // CONCEPT : Chemins cross-platform avec dirs
    // - data_local_dir() : ~/.local/share sur Linux
    // - Fallback sur ./logs si le répertoire n'est pas résolvable
    let log_dir = dirs::data_local_dir()
        .map(|dir| dir.join("lazyhistory").join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("./logs"));

    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    // Rotation quotidienne : un nouveau fichier chaque jour
    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "lazyhistory.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender) // Écrit dans le fichier
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true) // Inclut le module (ex: lazyhistory::api::server)
                .with_thread_ids(true) // Inclut l'ID du thread (utile pour le worker)
                .with_line_number(true),
        )
        .with(
            // Filtre les logs par niveau
            // - RUST_LOG=debug : tous les logs debug+
            // - Par défaut : debug pour lazyhistory, info pour les dépendances
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lazyhistory=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging FIRST
    // - Si init échoue, on affiche l'erreur et continue quand même
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("LazyHistory starting up");

    // Crée le view model partagé
    // CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
    // - Arc : Reference counting pour ownership partagé
    // - Mutex : Protection contre les data races
    // - Permet au worker thread et à l'UI d'accéder à App
    let app = Arc::new(Mutex::new(App::new()));

    // Construit le contrôleur : initialisation synchrone du view model
    // (history vide, edit_mode false, transactions vide), la capacité
    // d'accès aux données est passée explicitement en paramètre
    let source = ServerApi::from_env()?;
    let controller = HistoryController::new(app.clone(), source);

    // Canal de commandes vers le worker
    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();

    // Lance le worker thread en arrière-plan (il possède le contrôleur)
    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, controller);

    // Déclenche le chargement initial : l'appel ne bloque pas, la
    // continuation (assignation du résultat) s'exécute sur le worker
    // quand la requête résout
    info!("Requesting initial history load");
    command_tx
        .send(AppCommand::LoadHistory)
        .context("Worker thread indisponible au démarrage")?;

    // Setup du terminal en mode TUI
    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    // Crée le gestionnaire d'événements
    let events = EventHandler::new();

    // Exécute l'event loop
    info!("Starting event loop");
    let result = run(&mut terminal, app.clone(), &events, command_tx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// CONCEPT RUST : Background async worker avec channel
// - Thread séparé qui traite les commandes async
// - Reçoit des AppCommand via un channel (command_rx)
// - Écrit directement dans le view model partagé via le contrôleur
// - Permet de faire des appels API sans bloquer l'UI
//
// Cycle de vie : quand l'event loop se termine, le sender est droppé,
// recv() échoue et le worker sort après au plus un chargement en vol.
// Aucune continuation ne peut donc viser un view model disparu.
// ============================================================================

/// Worker thread qui exécute les tâches async en arrière-plan
///
/// CONCEPT RUST : Thread + async runtime
/// - std::thread::spawn() : crée un thread OS
/// - tokio::runtime::Runtime : runtime async dans ce thread
/// - block_on() bloque le thread worker (pas l'UI)
///
/// # Arguments
/// * `command_rx` - Receiver pour recevoir les commandes
/// * `controller` - Contrôleur possédant le view model et la source
fn spawn_background_worker<S>(command_rx: mpsc::Receiver<AppCommand>, controller: HistoryController<S>)
where
    S: TransactionSource + 'static,
{
    std::thread::spawn(move || {
        // Runtime tokio dédié à ce thread
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime, worker exiting");
                return;
            }
        };

        // Boucle de traitement des commandes
        loop {
            match command_rx.recv() {
                Ok(command) => {
                    info!(?command, "Worker received command");

                    match command {
                        AppCommand::LoadHistory => {
                            // Active l'indicateur de chargement
                            {
                                let mut app_lock = controller.app().lock().unwrap();
                                app_lock.start_loading(Some(
                                    "Chargement de l'historique…".to_string(),
                                ));
                            }

                            // Fetch + bind : le contrôleur logge les
                            // échecs et laisse la liste vide en place
                            runtime.block_on(controller.load_remote_data());

                            // Désactive l'indicateur de chargement
                            {
                                let mut app_lock = controller.app().lock().unwrap();
                                app_lock.stop_loading();
                            }
                        }
                    }
                }
                Err(_) => {
                    // Channel fermé, on quitte
                    info!("Worker thread exiting (channel closed)");
                    break;
                }
            }
        }
    });
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// CONCEPT : Event Loop Pattern
// - Loop infinie : while app.is_running()
// - À chaque itération : render → input → update
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// CONCEPT RUST : Arc<Mutex<>> pour partage entre threads
/// - Arc<Mutex<App>> : view model partagé entre UI et worker
/// - Mutex::lock() : obtenir accès exclusif temporaire
/// - command_tx : envoyer des commandes au worker
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: Arc<Mutex<App>>,
    events: &EventHandler,
    command_tx: mpsc::Sender<AppCommand>,
) -> Result<()> {
    loop {
        // Vérifie si l'app est toujours en cours d'exécution
        // CONCEPT : Lock scope minimisé
        {
            let app_lock = app.lock().unwrap();
            if !app_lock.is_running() {
                break;
            }
        }

        // ========================================
        // 1. RENDER : Dessine l'interface
        // ========================================
        // Le rendu lit le view model à chaque frame : quand le worker a
        // lié un nouvel historique, la frame suivante l'affiche
        {
            let app_clone = app.clone();
            terminal.draw(|frame| {
                let app_lock = app_clone.lock().unwrap();
                render(frame, &app_lock);
            })?;
        }

        // ========================================
        // 2. INPUT : Traite les événements
        // ========================================
        match events.next() {
            Ok(event) => {
                let mut app_lock = app.lock().unwrap();
                handle_event(&mut app_lock, event, &command_tx);
            }
            Err(_) => {
                // Erreur lors de la lecture d'événement
            }
        }

        // ========================================
        // 3. UPDATE : Met à jour l'état
        // ========================================
        {
            let mut app_lock = app.lock().unwrap();
            app_lock.tick();
        }
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement et met à jour l'état de l'application
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Guard clauses (if) pour filtrer les événements
/// - Navigation contextuelle selon l'écran actuel
fn handle_event(app: &mut App, event: lazyhistory::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use lazyhistory::ui::events::{
        is_down_event, is_enter_event, is_escape_event, is_quit_event, is_reload_event,
        is_space_event, is_up_event, Event,
    };

    match event {
        Event::Key(_) if is_quit_event(&event) => {
            // Touche 'q' : quit confirmation two-step
            // - Première pression : active confirm_quit
            // - Deuxième pression : quit réel
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }

        // 'r' : recharge l'historique (seulement sur le dashboard)
        Event::Key(_) if is_reload_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            info!("User requested history reload");
            // Chaque commande résout indépendamment et écrase la liste
            let _ = command_tx.send(AppCommand::LoadHistory);
        }

        // Navigation dans la liste (seulement sur le dashboard)
        Event::Key(_) if is_up_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            debug!("User navigated up");
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            debug!("User navigated down");
            app.navigate_down();
        }

        // Enter : afficher le détail de la transaction sélectionnée
        Event::Key(_) if is_enter_event(&event) && app.is_on_dashboard() => {
            app.cancel_quit();
            if let Some(tx) = app.selected_transaction() {
                info!(transaction_id = tx.id, "User opened transaction detail");
                app.show_detail();
            }
        }

        // ESC ou SPACE : retour au dashboard depuis le détail
        Event::Key(_) if (is_escape_event(&event) || is_space_event(&event)) && app.is_on_detail() => {
            app.cancel_quit();
            debug!("User returned to dashboard");
            app.show_dashboard();
        }

        Event::Tick => {
            // Tick régulier : rien à faire pour l'instant
        }

        Event::Key(_) => {
            // Toute autre touche : annule la confirmation si active
            app.cancel_quit();
        }

        _ => {
            // Autres événements : ignorés
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// CONCEPT RUST : Terminal raw mode
// - Raw mode : on reçoit tous les caractères directement
// - Alternate screen : écran secondaire (ne pollue pas l'historique)
//
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
///
/// CONCEPT RUST : Error propagation avec ?
/// - Chaque opération peut échouer
/// - ? propage automatiquement les erreurs
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);

    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
///
/// Appelé dans main() même en cas d'erreur, pour ne pas laisser le
/// terminal cassé
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;

    terminal.show_cursor()?;

    Ok(())
}

// ============================================================================
// Notes
// ============================================================================
//
// ARCHITECTURE :
//
// 1. Contrôleur load-and-bind
//    - Construction synchrone : défauts du view model
//    - Chargement async : une requête, une assignation en bloc
//    - Échec : loggé, liste vide conservée
//
// 2. Event Loop pattern
//    - Render → Input → Update
//    - Le rendu relit le view model à chaque frame
//
// 3. Worker thread
//    - Commandes via mpsc, runtime tokio dédié
//    - Vie liée au channel : plus de sender, plus de worker
//
// ============================================================================
