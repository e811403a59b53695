//! Static instruction and parameter-name tables.
//!
//! Both tables are plain data. Lookup maps are built on first use and never
//! change afterwards. The strings here are what existing scenario files are
//! written against, so they must not be renamed.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

use crate::command::CommandKind as K;
use crate::command::{slot, CommandKind, PARAM_SIZE};

/// Prefix of the open-ended `@cl.` instruction family.
pub const CIEL_PREFIX: &str = "@cl.";

/// Allowed parameter count of an instruction. `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arity {
    pub min: usize,
    pub max: Option<usize>,
}

impl Arity {
    const fn new(min: usize, max: usize) -> Self {
        Self { min, max: Some(max) }
    }

    pub const UNBOUNDED: Arity = Arity { min: 0, max: None };
}

#[derive(Debug, Clone, Copy)]
pub struct InsnItem {
    pub keyword: &'static str,
    pub kind: CommandKind,
    pub arity: Arity,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamItem {
    pub kind: CommandKind,
    pub slot: usize,
    /// Parameter name without the trailing `=`.
    pub name: &'static str,
}

const fn insn(keyword: &'static str, kind: CommandKind, min: usize, max: usize) -> InsnItem {
    InsnItem { keyword, kind, arity: Arity::new(min, max) }
}

const fn param(kind: CommandKind, slot: usize, name: &'static str) -> ParamItem {
    ParamItem { kind, slot, name }
}

pub static INSN_TABLE: &[InsnItem] = &[
    insn("@bg", K::Bg, 1, 5),
    insn("@背景", K::Bg, 1, 5),
    insn("@bgm", K::Bgm, 1, 2),
    insn("@音楽", K::Bgm, 1, 2),
    insn("@ch", K::Ch, 1, 7),
    insn("@キャラ", K::Ch, 1, 7),
    insn("@click", K::Click, 0, 1),
    insn("@クリック", K::Click, 0, 1),
    insn("@wait", K::Wait, 1, 2),
    insn("@時間待ち", K::Wait, 1, 2),
    insn("@goto", K::Goto, 1, 1),
    insn("@ジャンプ", K::Goto, 1, 1),
    insn("@labeledgoto", K::LabeledGoto, 2, 2),
    insn("@load", K::Load, 1, 2),
    insn("@シナリオ", K::Load, 1, 2),
    insn("@vol", K::Vol, 2, 3),
    insn("@音量", K::Vol, 2, 3),
    insn("@set", K::Set, 3, 3),
    insn("@フラグをセット", K::Set, 3, 3),
    insn("@if", K::If, 4, 4),
    insn("@フラグでジャンプ", K::If, 4, 4),
    insn("@unless", K::Unless, 4, 5),
    insn("@se", K::Se, 1, 2),
    insn("@効果音", K::Se, 1, 2),
    insn("@cha", K::Cha, 6, 6),
    insn("@キャラ移動", K::Cha, 6, 6),
    insn("@shake", K::Shake, 4, 4),
    insn("@振動", K::Shake, 4, 4),
    insn("@all", K::Chsx, 0, 30),
    insn("@chsx", K::Chsx, 0, 30),
    insn("@場面転換X", K::Chsx, 0, 30),
    insn("@video", K::Video, 1, 2),
    insn("@動画", K::Video, 1, 2),
    insn("@choose", K::Choose, 2, 20),
    insn("@選択肢", K::Choose, 2, 20),
    insn("@ichoose", K::IChoose, 2, 20),
    insn("@インライン選択肢", K::IChoose, 2, 20),
    insn("@mchoose", K::MChoose, 3, 30),
    insn("@条件付き選択肢", K::MChoose, 3, 30),
    insn("@michoose", K::MIChoose, 3, 30),
    insn("@条件付きインライン選択肢", K::MIChoose, 3, 30),
    insn("@chapter", K::Chapter, 1, 1),
    insn("@章", K::Chapter, 1, 1),
    insn("@gui", K::Gui, 1, 2),
    insn("@メニュー", K::Gui, 1, 2),
    insn("@wms", K::Wms, 1, 1),
    insn("@スクリプト", K::Wms, 1, 1),
    insn("@skip", K::Skip, 1, 1),
    insn("@スキップ", K::Skip, 1, 1),
    insn("@setsave", K::SetSave, 1, 1),
    insn("@anime", K::Anime, 1, 2),
    insn("@アニメ", K::Anime, 1, 2),
    insn("@layer", K::Layer, 2, 5),
    insn("@レイヤ", K::Layer, 2, 5),
    insn("@gosub", K::Gosub, 1, 10),
    insn("@return", K::Return, 0, 0),
    insn("@setconfig", K::SetConfig, 1, 2),
    insn("@設定", K::SetConfig, 1, 2),
    insn("@pencil", K::Pencil, 1, 2),
    insn("@鉛筆", K::Pencil, 1, 2),
    // deprecated
    insn("@news", K::News, 9, PARAM_SIZE),
    insn("@switch", K::Switch, 9, PARAM_SIZE),
    insn("@chs", K::Chs, 4, 7),
    insn("@場面転換", K::Chs, 4, 7),
];

pub static PARAM_TABLE: &[ParamItem] = &[
    // @bg
    param(K::Bg, slot::bg::FILE, "file"),
    param(K::Bg, slot::bg::FILE, "ファイル"),
    param(K::Bg, slot::bg::SPAN, "duration"),
    param(K::Bg, slot::bg::SPAN, "秒"),
    param(K::Bg, slot::bg::METHOD, "effect"),
    param(K::Bg, slot::bg::METHOD, "エフェクト"),
    param(K::Bg, slot::bg::X, "x"),
    param(K::Bg, slot::bg::Y, "y"),
    // @bgm
    param(K::Bgm, slot::bgm::FILE, "file"),
    param(K::Bgm, slot::bgm::FILE, "ファイル"),
    // @ch
    param(K::Ch, slot::ch::POS, "position"),
    param(K::Ch, slot::ch::POS, "位置"),
    param(K::Ch, slot::ch::FILE, "file"),
    param(K::Ch, slot::ch::FILE, "ファイル"),
    param(K::Ch, slot::ch::SPAN, "duration"),
    param(K::Ch, slot::ch::SPAN, "秒"),
    param(K::Ch, slot::ch::METHOD, "effect"),
    param(K::Ch, slot::ch::METHOD, "エフェクト"),
    param(K::Ch, slot::ch::OFFSET_X, "right"),
    param(K::Ch, slot::ch::OFFSET_X, "右"),
    param(K::Ch, slot::ch::OFFSET_Y, "down"),
    param(K::Ch, slot::ch::OFFSET_Y, "下"),
    param(K::Ch, slot::ch::ALPHA, "alpha"),
    param(K::Ch, slot::ch::ALPHA, "アルファ"),
    // @wait
    param(K::Wait, slot::wait::SPAN, "duration"),
    param(K::Wait, slot::wait::SPAN, "秒"),
    // @goto
    param(K::Goto, slot::goto::LABEL, "destination"),
    param(K::Goto, slot::goto::LABEL, "行き先"),
    // @load
    param(K::Load, slot::load::FILE, "file"),
    param(K::Load, slot::load::FILE, "ファイル"),
    param(K::Load, slot::load::LABEL, "label"),
    param(K::Load, slot::load::LABEL, "ラベル"),
    // @vol
    param(K::Vol, slot::vol::STREAM, "track"),
    param(K::Vol, slot::vol::STREAM, "トラック"),
    param(K::Vol, slot::vol::VOL, "volume"),
    param(K::Vol, slot::vol::VOL, "音量"),
    param(K::Vol, slot::vol::SPAN, "duration"),
    param(K::Vol, slot::vol::SPAN, "秒"),
    // @se
    param(K::Se, slot::se::FILE, "file"),
    param(K::Se, slot::se::FILE, "ファイル"),
    // @choose
    param(K::Choose, slot::choose::label(0), "destination1"),
    param(K::Choose, slot::choose::label(0), "行き先1"),
    param(K::Choose, slot::choose::text(0), "option1"),
    param(K::Choose, slot::choose::text(0), "選択肢1"),
    param(K::Choose, slot::choose::label(1), "destination2"),
    param(K::Choose, slot::choose::label(1), "行き先2"),
    param(K::Choose, slot::choose::text(1), "option2"),
    param(K::Choose, slot::choose::text(1), "選択肢2"),
    param(K::Choose, slot::choose::label(2), "destination3"),
    param(K::Choose, slot::choose::label(2), "行き先3"),
    param(K::Choose, slot::choose::text(2), "option3"),
    param(K::Choose, slot::choose::text(2), "選択肢3"),
    param(K::Choose, slot::choose::label(3), "destination4"),
    param(K::Choose, slot::choose::label(3), "行き先4"),
    param(K::Choose, slot::choose::text(3), "option4"),
    param(K::Choose, slot::choose::text(3), "選択肢4"),
    param(K::Choose, slot::choose::label(4), "destination5"),
    param(K::Choose, slot::choose::label(4), "行き先5"),
    param(K::Choose, slot::choose::text(4), "option5"),
    param(K::Choose, slot::choose::text(4), "選択肢5"),
    param(K::Choose, slot::choose::label(5), "destination6"),
    param(K::Choose, slot::choose::label(5), "行き先6"),
    param(K::Choose, slot::choose::text(5), "option6"),
    param(K::Choose, slot::choose::text(5), "選択肢6"),
    param(K::Choose, slot::choose::label(6), "destination7"),
    param(K::Choose, slot::choose::label(6), "行き先7"),
    param(K::Choose, slot::choose::text(6), "option7"),
    param(K::Choose, slot::choose::text(6), "選択肢7"),
    param(K::Choose, slot::choose::label(7), "destination8"),
    param(K::Choose, slot::choose::label(7), "行き先8"),
    param(K::Choose, slot::choose::text(7), "option8"),
    param(K::Choose, slot::choose::text(7), "選択肢8"),
    // @ichoose
    param(K::IChoose, slot::choose::label(0), "destination1"),
    param(K::IChoose, slot::choose::label(0), "行き先1"),
    param(K::IChoose, slot::choose::text(0), "option1"),
    param(K::IChoose, slot::choose::text(0), "選択肢1"),
    param(K::IChoose, slot::choose::label(1), "destination2"),
    param(K::IChoose, slot::choose::label(1), "行き先2"),
    param(K::IChoose, slot::choose::text(1), "option2"),
    param(K::IChoose, slot::choose::text(1), "選択肢2"),
    param(K::IChoose, slot::choose::label(2), "destination3"),
    param(K::IChoose, slot::choose::label(2), "行き先3"),
    param(K::IChoose, slot::choose::text(2), "option3"),
    param(K::IChoose, slot::choose::text(2), "選択肢3"),
    param(K::IChoose, slot::choose::label(3), "destination4"),
    param(K::IChoose, slot::choose::label(3), "行き先4"),
    param(K::IChoose, slot::choose::text(3), "option4"),
    param(K::IChoose, slot::choose::text(3), "選択肢4"),
    param(K::IChoose, slot::choose::label(4), "destination5"),
    param(K::IChoose, slot::choose::label(4), "行き先5"),
    param(K::IChoose, slot::choose::text(4), "option5"),
    param(K::IChoose, slot::choose::text(4), "選択肢5"),
    param(K::IChoose, slot::choose::label(5), "destination6"),
    param(K::IChoose, slot::choose::label(5), "行き先6"),
    param(K::IChoose, slot::choose::text(5), "option6"),
    param(K::IChoose, slot::choose::text(5), "選択肢6"),
    param(K::IChoose, slot::choose::label(6), "destination7"),
    param(K::IChoose, slot::choose::label(6), "行き先7"),
    param(K::IChoose, slot::choose::text(6), "option7"),
    param(K::IChoose, slot::choose::text(6), "選択肢7"),
    param(K::IChoose, slot::choose::label(7), "destination8"),
    param(K::IChoose, slot::choose::label(7), "行き先8"),
    param(K::IChoose, slot::choose::text(7), "option8"),
    param(K::IChoose, slot::choose::text(7), "選択肢8"),
    // @cha
    param(K::Cha, slot::cha::POS, "position"),
    param(K::Cha, slot::cha::POS, "位置"),
    param(K::Cha, slot::cha::SPAN, "duration"),
    param(K::Cha, slot::cha::SPAN, "秒"),
    param(K::Cha, slot::cha::ACCEL, "acceleration"),
    param(K::Cha, slot::cha::ACCEL, "加速"),
    param(K::Cha, slot::cha::OFFSET_X, "x"),
    param(K::Cha, slot::cha::OFFSET_Y, "y"),
    param(K::Cha, slot::cha::ALPHA, "alpha"),
    param(K::Cha, slot::cha::ALPHA, "アルファ"),
    // @shake
    param(K::Shake, slot::shake::MOVE, "direction"),
    param(K::Shake, slot::shake::MOVE, "方向"),
    param(K::Shake, slot::shake::SPAN, "duration"),
    param(K::Shake, slot::shake::SPAN, "秒"),
    param(K::Shake, slot::shake::TIMES, "times"),
    param(K::Shake, slot::shake::TIMES, "回数"),
    param(K::Shake, slot::shake::AMOUNT, "amplitude"),
    param(K::Shake, slot::shake::AMOUNT, "大きさ"),
    // @chs
    param(K::Chs, slot::chs::CENTER, "center"),
    param(K::Chs, slot::chs::CENTER, "centre"),
    param(K::Chs, slot::chs::CENTER, "中央"),
    param(K::Chs, slot::chs::RIGHT, "right"),
    param(K::Chs, slot::chs::RIGHT, "右"),
    param(K::Chs, slot::chs::LEFT, "left"),
    param(K::Chs, slot::chs::LEFT, "左"),
    param(K::Chs, slot::chs::BACK, "back"),
    param(K::Chs, slot::chs::BACK, "背面"),
    param(K::Chs, slot::chs::SPAN, "duration"),
    param(K::Chs, slot::chs::SPAN, "秒"),
    param(K::Chs, slot::chs::BG, "background"),
    param(K::Chs, slot::chs::BG, "背景"),
    param(K::Chs, slot::chs::METHOD, "effect"),
    param(K::Chs, slot::chs::METHOD, "エフェクト"),
    // @video
    param(K::Video, slot::video::FILE, "file"),
    param(K::Video, slot::video::FILE, "ファイル"),
    // @chapter
    param(K::Chapter, slot::chapter::NAME, "title"),
    param(K::Chapter, slot::chapter::NAME, "タイトル"),
    // @gui
    param(K::Gui, slot::gui::FILE, "file"),
    param(K::Gui, slot::gui::FILE, "ファイル"),
    // @wms
    param(K::Wms, slot::wms::FILE, "file"),
    param(K::Wms, slot::wms::FILE, "ファイル"),
    // @anime
    param(K::Anime, slot::anime::FILE, "file"),
    param(K::Anime, slot::anime::FILE, "ファイル"),
    // @layer
    param(K::Layer, slot::layer::NAME, "name"),
    param(K::Layer, slot::layer::NAME, "名前"),
    param(K::Layer, slot::layer::FILE, "file"),
    param(K::Layer, slot::layer::FILE, "ファイル"),
    param(K::Layer, slot::layer::X, "x"),
    param(K::Layer, slot::layer::Y, "y"),
    param(K::Layer, slot::layer::A, "a"),
    // @setconfig
    param(K::SetConfig, slot::setconfig::KEY, "key"),
    param(K::SetConfig, slot::setconfig::KEY, "名前"),
    param(K::SetConfig, slot::setconfig::VALUE, "value"),
    param(K::SetConfig, slot::setconfig::VALUE, "値"),
    // @all / @chsx
    param(K::Chsx, slot::chsx::C, "c"),
    param(K::Chsx, slot::chsx::C, "center"),
    param(K::Chsx, slot::chsx::C, "centre"),
    param(K::Chsx, slot::chsx::C, "中央"),
    param(K::Chsx, slot::chsx::CX, "cx"),
    param(K::Chsx, slot::chsx::CX, "center-x"),
    param(K::Chsx, slot::chsx::CX, "centre-x"),
    param(K::Chsx, slot::chsx::CX, "中央X"),
    param(K::Chsx, slot::chsx::CY, "cy"),
    param(K::Chsx, slot::chsx::CY, "center-y"),
    param(K::Chsx, slot::chsx::CY, "centre-y"),
    param(K::Chsx, slot::chsx::CY, "中央Y"),
    param(K::Chsx, slot::chsx::CA, "ca"),
    param(K::Chsx, slot::chsx::CA, "center-a"),
    param(K::Chsx, slot::chsx::CA, "centre-a"),
    param(K::Chsx, slot::chsx::CA, "中央A"),
    param(K::Chsx, slot::chsx::CD, "cd"),
    param(K::Chsx, slot::chsx::CD, "center-dim"),
    param(K::Chsx, slot::chsx::CD, "centre-dim"),
    param(K::Chsx, slot::chsx::CD, "中央の明暗"),
    param(K::Chsx, slot::chsx::R, "r"),
    param(K::Chsx, slot::chsx::R, "right"),
    param(K::Chsx, slot::chsx::R, "右"),
    param(K::Chsx, slot::chsx::RX, "rx"),
    param(K::Chsx, slot::chsx::RX, "right-x"),
    param(K::Chsx, slot::chsx::RX, "右X"),
    param(K::Chsx, slot::chsx::RY, "ry"),
    param(K::Chsx, slot::chsx::RY, "right-y"),
    param(K::Chsx, slot::chsx::RY, "右Y"),
    param(K::Chsx, slot::chsx::RA, "ra"),
    param(K::Chsx, slot::chsx::RA, "right-a"),
    param(K::Chsx, slot::chsx::RA, "右A"),
    param(K::Chsx, slot::chsx::RD, "rd"),
    param(K::Chsx, slot::chsx::RD, "right-dim"),
    param(K::Chsx, slot::chsx::RD, "右の明暗"),
    param(K::Chsx, slot::chsx::RC, "rc"),
    param(K::Chsx, slot::chsx::RC, "right-center"),
    param(K::Chsx, slot::chsx::RC, "right-centre"),
    param(K::Chsx, slot::chsx::RC, "右中"),
    param(K::Chsx, slot::chsx::RCX, "rcx"),
    param(K::Chsx, slot::chsx::RCX, "right-center-x"),
    param(K::Chsx, slot::chsx::RCX, "右中X"),
    param(K::Chsx, slot::chsx::RCY, "rcy"),
    param(K::Chsx, slot::chsx::RCY, "rightcenter-y"),
    param(K::Chsx, slot::chsx::RCY, "右中Y"),
    param(K::Chsx, slot::chsx::RCA, "rca"),
    param(K::Chsx, slot::chsx::RCA, "right-center-a"),
    param(K::Chsx, slot::chsx::RCA, "右中A"),
    param(K::Chsx, slot::chsx::RCD, "rcd"),
    param(K::Chsx, slot::chsx::RCD, "right-center-dim"),
    param(K::Chsx, slot::chsx::RCD, "right-centre-dim"),
    param(K::Chsx, slot::chsx::RCD, "右中央の明暗"),
    param(K::Chsx, slot::chsx::L, "l"),
    param(K::Chsx, slot::chsx::L, "left"),
    param(K::Chsx, slot::chsx::L, "左"),
    param(K::Chsx, slot::chsx::LX, "lx"),
    param(K::Chsx, slot::chsx::LX, "left-x"),
    param(K::Chsx, slot::chsx::LX, "左X"),
    param(K::Chsx, slot::chsx::LY, "ly"),
    param(K::Chsx, slot::chsx::LY, "left-y"),
    param(K::Chsx, slot::chsx::LY, "左Y"),
    param(K::Chsx, slot::chsx::LA, "la"),
    param(K::Chsx, slot::chsx::LA, "left-a"),
    param(K::Chsx, slot::chsx::LA, "左A"),
    param(K::Chsx, slot::chsx::LD, "ld"),
    param(K::Chsx, slot::chsx::LD, "left-dim"),
    param(K::Chsx, slot::chsx::LD, "左の明暗"),
    param(K::Chsx, slot::chsx::LC, "lc"),
    param(K::Chsx, slot::chsx::LC, "left-center"),
    param(K::Chsx, slot::chsx::LC, "left-centre"),
    param(K::Chsx, slot::chsx::LC, "左中"),
    param(K::Chsx, slot::chsx::LCX, "lcx"),
    param(K::Chsx, slot::chsx::LCX, "left-center-x"),
    param(K::Chsx, slot::chsx::LCX, "左中X"),
    param(K::Chsx, slot::chsx::LCY, "lcy"),
    param(K::Chsx, slot::chsx::LCY, "left-center-y"),
    param(K::Chsx, slot::chsx::LCY, "左中Y"),
    param(K::Chsx, slot::chsx::LCA, "lca"),
    param(K::Chsx, slot::chsx::LCA, "left-center-a"),
    param(K::Chsx, slot::chsx::LCA, "左中A"),
    param(K::Chsx, slot::chsx::LCD, "lcd"),
    param(K::Chsx, slot::chsx::LCD, "left-center-dim"),
    param(K::Chsx, slot::chsx::LCD, "left-centre-dim"),
    param(K::Chsx, slot::chsx::LCD, "左中央の明暗"),
    param(K::Chsx, slot::chsx::B, "b"),
    param(K::Chsx, slot::chsx::B, "back"),
    param(K::Chsx, slot::chsx::B, "背面"),
    param(K::Chsx, slot::chsx::BX, "bx"),
    param(K::Chsx, slot::chsx::BX, "back-x"),
    param(K::Chsx, slot::chsx::BX, "背面X"),
    param(K::Chsx, slot::chsx::BY, "by"),
    param(K::Chsx, slot::chsx::BY, "back-y"),
    param(K::Chsx, slot::chsx::BY, "背面Y"),
    param(K::Chsx, slot::chsx::BA, "ba"),
    param(K::Chsx, slot::chsx::BA, "back-a"),
    param(K::Chsx, slot::chsx::BA, "背面A"),
    param(K::Chsx, slot::chsx::BD, "bd"),
    param(K::Chsx, slot::chsx::BD, "back-dim"),
    param(K::Chsx, slot::chsx::BD, "背面の明暗"),
    param(K::Chsx, slot::chsx::BG, "bg"),
    param(K::Chsx, slot::chsx::BG, "background"),
    param(K::Chsx, slot::chsx::BG, "背景"),
    param(K::Chsx, slot::chsx::BGX, "bgx"),
    param(K::Chsx, slot::chsx::BGX, "bg-x"),
    param(K::Chsx, slot::chsx::BGX, "背景X"),
    param(K::Chsx, slot::chsx::BGY, "bgy"),
    param(K::Chsx, slot::chsx::BGY, "bg-y"),
    param(K::Chsx, slot::chsx::BGY, "背景Y"),
    param(K::Chsx, slot::chsx::BGA, "bga"),
    param(K::Chsx, slot::chsx::BGA, "bg-a"),
    param(K::Chsx, slot::chsx::BGA, "背景A"),
    param(K::Chsx, slot::chsx::METHOD, "e"),
    param(K::Chsx, slot::chsx::METHOD, "effect"),
    param(K::Chsx, slot::chsx::METHOD, "エフェクト"),
    param(K::Chsx, slot::chsx::SPAN, "t"),
    param(K::Chsx, slot::chsx::SPAN, "duration"),
    param(K::Chsx, slot::chsx::SPAN, "秒"),
    // @cl.*
    param(K::Ciel, slot::ciel::NAME, "name"),
    param(K::Ciel, slot::ciel::FILE, "file"),
    param(K::Ciel, slot::ciel::ALIGN, "align"),
    param(K::Ciel, slot::ciel::VALIGN, "valign"),
    param(K::Ciel, slot::ciel::XEQUAL, "x"),
    param(K::Ciel, slot::ciel::XPLUS, "x+"),
    param(K::Ciel, slot::ciel::XMINUS, "x-"),
    param(K::Ciel, slot::ciel::YEQUAL, "y"),
    param(K::Ciel, slot::ciel::YPLUS, "y+"),
    param(K::Ciel, slot::ciel::YMINUS, "y-"),
    param(K::Ciel, slot::ciel::ALPHA, "a"),
    param(K::Ciel, slot::ciel::TIME, "t"),
    param(K::Ciel, slot::ciel::EFFECT, "effect"),
    param(K::Ciel, slot::ciel::DIM, "dim"),
];

static INSN_MAP: Lazy<FxHashMap<&'static str, &'static InsnItem>> =
    Lazy::new(|| INSN_TABLE.iter().map(|item| (item.keyword, item)).collect());

static PARAM_MAP: Lazy<FxHashMap<CommandKind, FxHashMap<&'static str, usize>>> = Lazy::new(|| {
    let mut map: FxHashMap<CommandKind, FxHashMap<&'static str, usize>> = FxHashMap::default();
    for item in PARAM_TABLE {
        map.entry(item.kind).or_default().insert(item.name, item.slot);
    }
    map
});

/// Resolves an instruction keyword (including its `@`) to a kind and arity.
pub fn lookup_instruction(keyword: &str) -> Option<(CommandKind, Arity)> {
    if keyword.starts_with(CIEL_PREFIX) {
        return Some((CommandKind::Ciel, Arity::UNBOUNDED));
    }
    INSN_MAP.get(keyword).map(|item| (item.kind, item.arity))
}

/// Resolves a parameter name (without `=`) to its slot under `kind`.
pub fn lookup_param(kind: CommandKind, name: &str) -> Option<usize> {
    PARAM_MAP.get(&kind).and_then(|names| names.get(name)).copied()
}

/// Kinds whose named parameters may appear in any order.
pub fn is_reorderable(kind: CommandKind) -> bool {
    matches!(kind, CommandKind::Chsx | CommandKind::Ciel)
}

/// Kinds that reject bare positional values.
pub fn requires_names(kind: CommandKind) -> bool {
    is_reorderable(kind)
}

/// Kinds whose tokens are stored verbatim, `=` included.
pub fn is_raw(kind: CommandKind) -> bool {
    matches!(
        kind,
        CommandKind::Set | CommandKind::If | CommandKind::Unless | CommandKind::Pencil
    )
}

/// Ordering contract for named parameters: on strict kinds, the parameter at
/// `position` must be the one whose table slot is `position`.
pub fn check_order(kind: CommandKind, position: usize, slot: usize) -> bool {
    is_reorderable(kind) || position == slot
}

/// All `(name, slot)` pairs for a kind, in table order. Used by tooling that
/// generates editor forms.
pub fn param_names(kind: CommandKind) -> impl Iterator<Item = (&'static str, usize)> {
    PARAM_TABLE
        .iter()
        .filter(move |item| item.kind == kind)
        .map(|item| (item.name, item.slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_and_localized_share_kind() {
        assert_eq!(lookup_instruction("@bg"), lookup_instruction("@背景"));
        assert_eq!(lookup_instruction("@bg").map(|(k, _)| k), Some(CommandKind::Bg));
    }

    #[test]
    fn ciel_prefix_is_unbounded() {
        let (kind, arity) = lookup_instruction("@cl.move").unwrap();
        assert_eq!(kind, CommandKind::Ciel);
        assert_eq!(arity.max, None);
    }

    #[test]
    fn unknown_keyword() {
        assert!(lookup_instruction("@nope").is_none());
        assert!(lookup_param(CommandKind::Bg, "volume").is_none());
    }

    #[test]
    fn no_duplicate_names_within_a_kind() {
        let mut seen = rustc_hash::FxHashSet::default();
        for item in PARAM_TABLE {
            assert!(seen.insert((item.kind, item.name)), "duplicate {}", item.name);
        }
    }

    #[test]
    fn strict_slots_follow_table_order() {
        assert!(check_order(CommandKind::Load, 1, slot::load::LABEL));
        assert!(!check_order(CommandKind::Load, 0, slot::load::LABEL));
        assert!(check_order(CommandKind::Chsx, 0, slot::chsx::SPAN));
    }
}
