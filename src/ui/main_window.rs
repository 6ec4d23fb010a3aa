use fltk::{
    app::Sender,
    browser::HoldBrowser,
    button::Button,
    enums::{Align, Color, Font, FrameType},
    frame::Frame,
    group::{Flex, FlexType},
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextDisplay, TextEditor},
    window::Window,
};

use crate::app::domain::messages::Message;

pub const WINDOW_TITLE: &str = "HtmlForge";

const MENU_HEIGHT: i32 = 30;
const TOOLBAR_HEIGHT: i32 = 36;
const PANE_LABEL_HEIGHT: i32 = 22;
const STATUS_HEIGHT: i32 = 26;
const ISSUES_HEIGHT: i32 = 150;

pub struct MainWidgets {
    pub wind: Window,
    pub menu: MenuBar,
    pub input: TextEditor,
    pub output: TextDisplay,
    pub issues: HoldBrowser,
    pub status: Frame,
    pub labels: Vec<Frame>,
    pub buttons: Vec<Button>,
}

pub fn build_main_window(sender: &Sender<Message>) -> MainWidgets {
    let mut wind = Window::new(100, 100, 1100, 720, WINDOW_TITLE);
    wind.set_xclass("HtmlForge");

    let mut root = Flex::new(0, 0, 1100, 720, None);
    root.set_type(FlexType::Column);

    let menu = MenuBar::new(0, 0, 0, MENU_HEIGHT, "");
    root.fixed(&menu, MENU_HEIGHT);

    // Action buttons
    let mut toolbar = Flex::default();
    toolbar.set_type(FlexType::Row);
    toolbar.set_margin(4);
    toolbar.set_spacing(6);
    let mut buttons = Vec::new();
    for (label, msg) in [
        ("Compile HTML", Message::Compile),
        ("Preview in Browser", Message::PreviewInBrowser),
        ("Clear All", Message::ClearAll),
    ] {
        let mut btn = Button::default().with_label(label);
        btn.emit(*sender, msg);
        toolbar.fixed(&btn, 160);
        buttons.push(btn);
    }
    Frame::default();
    toolbar.end();
    root.fixed(&toolbar, TOOLBAR_HEIGHT);

    // Input and output side by side
    let mut panes = Flex::default();
    panes.set_type(FlexType::Row);
    panes.set_spacing(6);

    let mut labels = Vec::new();

    let mut input_col = Flex::default();
    input_col.set_type(FlexType::Column);
    let input_label = pane_label("Input HTML");
    input_col.fixed(&input_label, PANE_LABEL_HEIGHT);
    let mut input = TextEditor::new(0, 0, 0, 0, "");
    input.set_buffer(TextBuffer::default());
    input.set_text_font(Font::Courier);
    input_col.end();
    labels.push(input_label);

    let mut output_col = Flex::default();
    output_col.set_type(FlexType::Column);
    let output_label = pane_label("Output HTML");
    output_col.fixed(&output_label, PANE_LABEL_HEIGHT);
    let mut output = TextDisplay::new(0, 0, 0, 0, "");
    output.set_buffer(TextBuffer::default());
    output.set_text_font(Font::Courier);
    output_col.end();
    labels.push(output_label);

    panes.end();

    let mut status = Frame::default();
    status.set_frame(FrameType::FlatBox);
    status.set_align(Align::Left | Align::Inside);
    status.set_label_size(13);
    root.fixed(&status, STATUS_HEIGHT);

    let mut issues = HoldBrowser::default();
    issues.set_text_size(13);
    {
        let s = *sender;
        issues.set_callback(move |b| s.send(Message::IssueSelected(b.value())));
    }
    root.fixed(&issues, ISSUES_HEIGHT);

    root.end();
    wind.resizable(&root);
    wind.end();

    MainWidgets {
        wind,
        menu,
        input,
        output,
        issues,
        status,
        labels,
        buttons,
    }
}

fn pane_label(text: &str) -> Frame {
    let mut frame = Frame::default().with_label(text);
    frame.set_align(Align::Left | Align::Inside);
    frame.set_label_font(Font::HelveticaBold);
    frame.set_label_size(14);
    frame.set_label_color(Color::Foreground);
    frame
}
