use iced::{
    Element, Length, Task, Color, Alignment, Border,
};
use iced::widget::{
    Column, Row, Container, Text, Button, PickList, ProgressBar, Scrollable, Space, rule,
};

use crate::config::Settings;
use crate::file_ops::{self, HashEvent};
use crate::models::*;
use crate::session::{Epochs, Ticket};
use std::num::NonZeroU64;
use std::path::PathBuf;
use rfd::FileDialog;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    SelectFile,
    Hashing,
    Result,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub enum Message {
    ChooseFile,
    FileChosen(Option<PathBuf>),
    AlgorithmSelected(Algorithm),
    Hash(Ticket, HashEvent),
    Rehash,
    Reset,
    ToggleHistory,
    ToggleTheme,
}

pub struct ChunkHashApp {
    // UI state
    chosen_file: Option<PathBuf>,
    algorithm: Algorithm,
    chunk_size: NonZeroU64,
    current_step: Step,
    progress: Option<Progress>,
    show_history: bool,
    last_result: Option<Result<HashRecord, String>>,
    theme: Theme,

    epochs: Epochs,

    // this session only
    history: Vec<HashRecord>,
}

impl ChunkHashApp {
    pub fn new(settings: Settings) -> (Self, Task<Message>) {
        (
            ChunkHashApp {
                chosen_file: None,
                algorithm: settings.algorithm,
                chunk_size: settings.chunk_size,
                current_step: Step::SelectFile,
                progress: None,
                show_history: false,
                last_result: None,
                theme: Theme::Light,
                epochs: Epochs::default(),
                history: Vec::new(),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ChooseFile => {
                return Task::perform(async {
                    FileDialog::new().set_directory(".").pick_file()
                }, Message::FileChosen);
            }
            Message::FileChosen(Some(path)) => {
                return self.start_hash(path);
            }
            Message::FileChosen(None) => { /* cancelled */ }
            Message::AlgorithmSelected(a) => {
                self.algorithm = a;
            }
            Message::Rehash => {
                if let Some(path) = self.chosen_file.clone() {
                    return self.start_hash(path);
                }
            }
            Message::Hash(ticket, HashEvent::Progress(p)) => {
                if self.epochs.is_current(ticket) && self.current_step == Step::Hashing {
                    self.progress = Some(p);
                }
            }
            Message::Hash(ticket, HashEvent::Finished(result)) => {
                if let Some(result) = self.epochs.accept(ticket, result) {
                    self.finish(result);
                }
            }
            Message::Reset => {
                self.epochs.invalidate();
                self.chosen_file = None;
                self.progress = None;
                self.current_step = Step::SelectFile;
                self.last_result = None;
            }
            Message::ToggleHistory => {
                self.show_history = !self.show_history;
            }
            Message::ToggleTheme => {
                self.theme = match self.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Light,
                };
            }
        }
        Task::none()
    }

    fn start_hash(&mut self, path: PathBuf) -> Task<Message> {
        let ticket = self.epochs.issue();
        info!(?ticket, path = %path.display(), algorithm = %self.algorithm, "hash requested");

        self.chosen_file = Some(path.clone());
        self.current_step = Step::Hashing;
        self.progress = None;
        self.last_result = None;

        Task::run(
            file_ops::hash_file_events(path, self.algorithm, self.chunk_size),
            move |event| Message::Hash(ticket, event),
        )
    }

    fn finish(&mut self, result: Result<HashRecord, String>) {
        self.current_step = Step::Result;
        self.progress = None;
        match &result {
            Ok(rec) => {
                info!(file = %rec.file_name, digest = %rec.result.digest, percentage = rec.result.percentage, "hash complete");
                self.history.insert(0, rec.clone());
            }
            Err(e) => {
                warn!(error = %e, "hash failed");
            }
        }
        self.last_result = Some(result);
    }

    pub fn view(&self) -> Element<'_, Message> {
        let sidebar = self.view_sidebar();

        let main_content = match self.current_step {
            Step::SelectFile => self.view_select_file(),
            Step::Hashing => self.view_hashing(),
            Step::Result => self.view_result(),
        };

        let layout = Row::new()
            .push(sidebar)
            .push(rule::Rule::vertical(1))
            .push(main_content);

        let bg_color = self.bg_color();
        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(move |_theme| {
                iced::widget::container::Style {
                    background: Some(iced::Background::Color(bg_color)),
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .into()
    }

    fn view_sidebar(&self) -> Element<'_, Message> {
        let accent = self.accent_color();
        let text_color = self.text_color();
        let secondary_text = self.secondary_text_color();
        let tertiary_text = self.tertiary_text_color();

        let title = Text::new("ChunkHash")
            .size(28)
            .style(move |_theme| iced::widget::text::Style { color: Some(accent) });

        let subtitle = Text::new("Chunked File Hasher")
            .size(14)
            .style(move |_theme| iced::widget::text::Style { color: Some(secondary_text) });

        let algo_label = Text::new("Hash Algorithm")
            .size(16)
            .style(move |_theme| iced::widget::text::Style { color: Some(text_color) });

        let algo_picker = PickList::new(
            Algorithm::all(),
            Some(self.algorithm),
            Message::AlgorithmSelected,
        )
        .padding(10)
        .width(Length::Fill);

        let chunk_info = Text::new(format!("Chunk size: {} KiB", self.chunk_size.get() / 1024))
            .size(12)
            .style(move |_theme| iced::widget::text::Style { color: Some(tertiary_text) });

        let theme_btn = Button::new(
            Text::new(match self.theme {
                Theme::Light => "🌙 Dark Mode",
                Theme::Dark => "☀️ Light Mode",
            })
                .size(14)
        )
        .on_press(Message::ToggleTheme)
        .padding(10)
        .width(Length::Fill);

        let history_btn = Button::new(
            Text::new(if self.show_history { "Hide History" } else { "Show History" })
                .size(14)
        )
        .on_press(Message::ToggleHistory)
        .padding(10)
        .width(Length::Fill);

        let mut sidebar_content = Column::new()
            .padding(20)
            .spacing(20)
            .width(Length::Fixed(280.0))
            .push(title)
            .push(subtitle)
            .push(rule::Rule::horizontal(1))
            .push(algo_label)
            .push(algo_picker)
            .push(chunk_info)
            .push(Space::with_height(20))
            .push(theme_btn)
            .push(history_btn);

        if self.show_history {
            sidebar_content = sidebar_content
                .push(rule::Rule::horizontal(1))
                .push(Text::new("This Session").size(14));

            let mut history_list = Column::new().spacing(8);
            for r in self.history.iter().take(10) {
                let item = Column::new()
                    .spacing(4)
                    .push(Text::new(&r.file_name).size(12))
                    .push(
                        Text::new(format!("{} {}", r.result.algorithm, short_digest(&r.result.digest)))
                            .size(10)
                            .style(move |_theme| iced::widget::text::Style { color: Some(tertiary_text) })
                    )
                    .push(
                        Text::new(r.timestamp.format("%H:%M:%S").to_string())
                            .size(10)
                            .style(move |_theme| iced::widget::text::Style { color: Some(tertiary_text) })
                    );
                history_list = history_list.push(item);
            }

            sidebar_content = sidebar_content.push(
                Scrollable::new(history_list).height(Length::Fixed(200.0))
            );
        }

        let sidebar_bg = self.sidebar_bg_color();
        Container::new(sidebar_content)
            .height(Length::Fill)
            .style(move |_theme| {
                iced::widget::container::Style {
                    background: Some(iced::Background::Color(sidebar_bg)),
                    border: Border::default(),
                    ..Default::default()
                }
            })
            .into()
    }

    fn view_select_file(&self) -> Element<'_, Message> {
        let text_color = self.text_color();
        let secondary_text = self.secondary_text_color();

        let title = Text::new("Select a File")
            .size(32)
            .style(move |_theme| iced::widget::text::Style { color: Some(text_color) });

        let description = Text::new("Hashing starts as soon as a file is chosen")
            .size(16)
            .style(move |_theme| iced::widget::text::Style { color: Some(secondary_text) });

        let browse_btn = Button::new(Text::new("Browse Files").size(18))
            .on_press(Message::ChooseFile)
            .padding(15)
            .width(Length::Fixed(200.0));

        let content = Column::new()
            .padding(40)
            .spacing(30)
            .width(Length::Fill)
            .push(title)
            .push(description)
            .push(Space::with_height(20))
            .push(browse_btn);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    fn view_hashing(&self) -> Element<'_, Message> {
        let text_color = self.text_color();
        let secondary_text = self.secondary_text_color();

        let title = Text::new("Hashing...")
            .size(32)
            .style(move |_theme| iced::widget::text::Style { color: Some(text_color) });

        let file = Text::new(
            self.chosen_file.as_ref().map(|p| p.display().to_string()).unwrap_or_default()
        )
            .size(16)
            .style(move |_theme| iced::widget::text::Style { color: Some(secondary_text) });

        let (value, detail) = match &self.progress {
            Some(p) => (
                p.percentage(),
                format!("Chunk {} of {}", p.chunk_index + 1, p.chunks_total),
            ),
            None => (0.0, "Preparing chunks...".to_string()),
        };

        let bar = ProgressBar::new(0.0..=100.0, value).width(Length::Fixed(400.0));

        // Picking another file supersedes this run.
        let browse_btn = Button::new(Text::new("Choose Another File").size(14))
            .on_press(Message::ChooseFile)
            .padding(12);

        let content = Column::new()
            .padding(40)
            .spacing(30)
            .width(Length::Fill)
            .align_x(Alignment::Center)
            .push(title)
            .push(file)
            .push(bar)
            .push(Text::new(detail).size(14))
            .push(browse_btn);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    }

    fn view_result(&self) -> Element<'_, Message> {
        let text_color = self.text_color();
        let secondary_text = self.secondary_text_color();
        let container_bg = self.container_bg_color();
        let border_color = self.border_color();

        let (title, title_color) = match &self.last_result {
            Some(Ok(_)) => ("Hash Computed", Color::from_rgb(0.2, 0.7, 0.2)),
            _ => ("Hashing Failed", Color::from_rgb(0.9, 0.2, 0.2)),
        };

        let title_text = Text::new(title)
            .size(36)
            .style(move |_theme| iced::widget::text::Style { color: Some(title_color) });

        let field = |label: &'static str, value: String| {
            Column::new()
                .spacing(5)
                .push(Text::new(label).size(14).style(move |_theme| {
                    iced::widget::text::Style { color: Some(secondary_text) }
                }))
                .push(
                    Container::new(Text::new(value).size(14).style(move |_theme| {
                        iced::widget::text::Style { color: Some(text_color) }
                    }))
                        .padding(10)
                        .width(Length::Fill)
                        .style(move |_theme| {
                            iced::widget::container::Style {
                                background: Some(iced::Background::Color(container_bg)),
                                border: Border {
                                    color: border_color,
                                    width: 1.0,
                                    radius: 4.0.into(),
                                },
                                ..Default::default()
                            }
                        })
                )
        };

        let mut details = Column::new().spacing(15).width(Length::Fill);
        match &self.last_result {
            Some(Ok(rec)) => {
                details = details
                    .push(field("File:", rec.file_path.display().to_string()))
                    .push(field("Algorithm:", rec.result.algorithm.name().to_string()))
                    .push(field(
                        "Size:",
                        format!("{} bytes in {} chunk(s)", rec.result.bytes, rec.result.chunks),
                    ))
                    .push(field("Digest:", rec.result.digest.clone()));
            }
            Some(Err(e)) => {
                details = details.push(field("Error:", e.clone()));
            }
            None => {}
        }

        let buttons = Row::new()
            .spacing(20)
            .push(
                Button::new(Text::new("Hash Again").size(16))
                    .on_press(Message::Rehash)
                    .padding(15)
            )
            .push(
                Button::new(Text::new("New File").size(16))
                    .on_press(Message::Reset)
                    .padding(15)
            );

        let content = Column::new()
            .padding(40)
            .spacing(25)
            .width(Length::Fill)
            .align_x(Alignment::Center)
            .push(title_text)
            .push(Space::with_height(20))
            .push(details)
            .push(Space::with_height(30))
            .push(buttons);

        Container::new(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    // Theme color helpers
    fn bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(1.0, 1.0, 1.0),
            Theme::Dark => Color::from_rgb(0.11, 0.11, 0.13),
        }
    }

    fn sidebar_bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.95, 0.95, 0.97),
            Theme::Dark => Color::from_rgb(0.15, 0.15, 0.17),
        }
    }

    fn text_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.1, 0.1, 0.1),
            Theme::Dark => Color::from_rgb(0.9, 0.9, 0.9),
        }
    }

    fn secondary_text_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.4, 0.4, 0.4),
            Theme::Dark => Color::from_rgb(0.6, 0.6, 0.6),
        }
    }

    fn tertiary_text_color(&self) -> Color {
        Color::from_rgb(0.5, 0.5, 0.5)
    }

    fn container_bg_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.95, 0.95, 0.95),
            Theme::Dark => Color::from_rgb(0.2, 0.2, 0.22),
        }
    }

    fn border_color(&self) -> Color {
        match self.theme {
            Theme::Light => Color::from_rgb(0.8, 0.8, 0.8),
            Theme::Dark => Color::from_rgb(0.3, 0.3, 0.32),
        }
    }

    fn accent_color(&self) -> Color {
        Color::from_rgb(0.2, 0.5, 0.8)
    }
}

fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
