use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{DefaultTerminal, Frame};

use tui_catalogtree::catalogs::games::{GameFlags, GameGroups, GameInfo, GameType, SkillLevel};
use tui_catalogtree::catalogs::{game_catalog, game_tree};
use tui_catalogtree::{
    CatalogKind, CatalogLabels, SelectEvent, SelectTree, SelectTreeConfig, SelectionController,
    TreeCache, TreeListView, TreeListViewStyle,
};

fn sample_games() -> Vec<GameInfo> {
    vec![
        GameInfo::new(2, "Klondike", GameType::Klondike)
            .with_alt_names(["Patience", "Demon Patience"])
            .with_flags(GameFlags::POPULAR)
            .with_skill(SkillLevel::MostlyLuck),
        GameInfo::new(8, "FreeCell", GameType::FreeCell)
            .with_flags(GameFlags::OPEN | GameFlags::POPULAR)
            .with_skill(SkillLevel::MostlySkill),
        GameInfo::new(11, "Spider", GameType::Spider).with_decks(2, 104),
        GameInfo::new(14, "Scorpion", GameType::Spider),
        GameInfo::new(25, "Golf", GameType::Golf).with_skill(SkillLevel::Luck),
        GameInfo::new(36, "Canfield", GameType::Canfield).with_redeals(-1),
        GameInfo::new(105, "Yukon", GameType::Yukon).with_flags(GameFlags::OPEN),
        GameInfo::new(12345, "Mahjongg Fortress", GameType::Mahjongg),
        GameInfo::new(22, "Wizard", GameType::Tarock)
            .with_decks(1, 78)
            .with_flags(GameFlags::ORIGINAL),
    ]
}

fn sample_groups() -> GameGroups {
    GameGroups {
        compatibility: vec![("Windows Solitaire".to_owned(), vec![2, 8])],
        pysol_versions: vec![("3.00".to_owned(), vec![11, 25])],
        inventors: vec![("Albert Morehead and Geoffrey Mott-Smith".to_owned(), vec![105])],
    }
}

fn render(
    frame: &mut Frame,
    tree: &SelectTree<GameInfo>,
    controller: &mut SelectionController<GameInfo>,
    preview: &RefCell<Option<u32>>,
    style: &TreeListViewStyle<'_>,
) {
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Fill(1)]).areas(frame.area());

    let highlighted = controller.selected_leaves();
    let widget = TreeListView::new(tree, &CatalogLabels, style.clone()).highlighted(&highlighted);
    frame.render_stateful_widget(widget, list_area, controller.view_mut());

    let shown = *preview.borrow();
    let text: Vec<Line<'_>> = match shown.and_then(|key| tree.catalog().get(&key)) {
        Some(game) => vec![
            Line::from(game.name.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
            Line::from(format!("{:?}, {} deck(s)", game.game_type, game.decks)),
            Line::from(format!("Skill: {:?}", game.skill_level)),
        ],
        None => vec![Line::from("(nothing selected)")],
    };
    let block = Block::default().borders(Borders::ALL).title("Preview");
    frame.render_widget(Paragraph::new(text).block(block), preview_area);
}

fn run_app(mut terminal: DefaultTerminal, cache: &mut TreeCache<GameInfo>) -> io::Result<Option<u32>> {
    let tree = cache.get_or_build(CatalogKind::Games, || {
        game_tree(
            game_catalog(sample_games()),
            &sample_groups(),
            &SelectTreeConfig::default(),
        )
    });
    let shown = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&shown);
    let mut controller = SelectionController::new(Rc::clone(&tree), Some(2))
        .with_preview(move |key: &u32| *sink.borrow_mut() = Some(*key));
    controller.refresh_preview();
    controller.reveal_selection();

    let mut style = TreeListViewStyle::default();
    style.highlight_style = Style::default()
        .fg(Color::Rgb(255, 255, 255))
        .bg(Color::Rgb(52, 66, 96));
    style.selection_style = Style::default()
        .fg(Color::Rgb(136, 192, 208))
        .add_modifier(Modifier::BOLD);
    style.title = Some(Line::from("Select game"));

    loop {
        if controller.take_redraw() {
            terminal.draw(|frame| render(frame, &tree, &mut controller, &shown, &style))?;
        }

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => return Ok(controller.cancel()),
                _ => {
                    if let SelectEvent::Confirmed(key) = controller.handle_key(key) {
                        return Ok(key);
                    }
                }
            },
            Event::Resize(_, _) => {
                terminal.draw(|frame| render(frame, &tree, &mut controller, &shown, &style))?;
            }
            _ => {}
        }
    }
}

fn main() -> io::Result<()> {
    let mut cache = TreeCache::new();
    let terminal = ratatui::init();
    let result = run_app(terminal, &mut cache);
    ratatui::restore();
    match result? {
        Some(id) => println!("selected game #{id}"),
        None => println!("no game selected"),
    }
    Ok(())
}
