#![warn(clippy::uninlined_format_args)]

#[cfg(all(feature = "zh", feature = "en"))]
compile_error!("Cannot enable both 'zh' and 'en' features at the same time");

#[cfg(feature = "zh")]
pub mod strings {
    pub const WELCOME: &str = "嗨！我是您的記帳助手\n\
        請輸入成員名單（以「、」分隔），\n\
        或一次性輸入所有資訊，例如：\n\
        成員有Alice、Bob、Charlie\n\
        Alice付了100元晚餐\n\
        Bob付了200元電影\n\
        晚餐沒Charlie\n\
        電影沒Alice";
    pub const PROMPT_MEMBERS: &str = "請輸入成員名單（以「、」分隔）。";
    pub const PROMPT_PAYMENTS: &str = "請輸入付款記錄，每行格式：[成員]付了[金額]元[項目]。";
    pub const PROMPT_EXCLUSIONS: &str =
        "請輸入分攤情況，每行格式：[項目]沒[成員]。若全員均分，請輸入「無」。";
    pub const CONFIRM_SUFFIX: &str = "請確認是否正確？（是/否）";
    pub const REPROMPT_CONFIRM: &str = "請輸入「是」或「否」來確認解析結果是否正確。\n或輸入「重置」重新開始。";
    pub const MANUAL_FALLBACK_INSTRUCTIONS: &str = "多次拒絕解析結果。\n\
        請手動輸入正確的格式：\n\
        例如：\n\
        【一、成員名單】\nAlice、Bob、Charlie\n\
        【二、付款記錄】\nAlice付了100元晚餐\nBob付了200元電影\n\
        【三、分攤情況】\n晚餐沒Charlie\n電影沒Alice";
    pub const RETRY_EXHAUSTED_INSTRUCTIONS: &str = "多次嘗試解析失敗，請重新檢查輸入格式。\n\
        請一次輸入三個段落：\n\
        【一、成員名單】\n【二、付款記錄】\n【三、分攤情況】";
    pub const RESULT_HEADER: &str = "計算結果如下：";
    pub const PARSED_HEADER: &str = "解析結果如下：";
    pub const ALREADY_BALANCED: &str = "無需轉帳，一切平衡！";
    pub const SECTION_MEMBERS: &str = "【一、成員名單】";
    pub const SECTION_PAYMENTS: &str = "【二、付款記錄】";
    pub const SECTION_SPLITS: &str = "【三、分攤情況】";
    pub const SECTION_SETTLEMENT: &str = "【四、每人結算金額】";
    pub const SECTION_TRANSFERS: &str = "【五、轉帳方案】";
    pub const OVERPAID: &str = "多付";
    pub const UNDERPAID: &str = "少付";
    pub const DETAIL_CALC: &str = "詳細計算";
    pub const LABEL_SEP: &str = "：";
    pub const PARTICIPANTS: &str = "參與者";
    pub const PER_PERSON: &str = "每人應付";
    pub const CURRENCY_SUFFIX: &str = " 元";
    pub const CHART_FAILED: &str = "圖表生成失敗，但計算結果不受影響。";
    pub const INTERNAL_ERROR: &str = "發生錯誤，請重新輸入。";
    pub const MEMBER_JOIN: &str = "、";
    pub const TABLE_MEMBER: &str = "成員";
    pub const TABLE_PAID: &str = "已付";
    pub const TABLE_OWED: &str = "應付";
    pub const TABLE_BALANCE: &str = "結餘";
    pub const TABLE_FROM: &str = "付款人";
    pub const TABLE_TO: &str = "收款人";
    pub const TABLE_AMOUNT: &str = "金額";
}

#[cfg(feature = "en")]
pub mod strings {
    pub const WELCOME: &str = "Hi! I'm your expense-splitting assistant.\n\
        Enter the member roster (separated by commas),\n\
        or everything at once, for example:\n\
        members are Alice, Bob, Charlie\n\
        Alice paid 100 for dinner\n\
        Bob paid 200 for movie\n\
        dinner excludes Charlie\n\
        movie excludes Alice";
    pub const PROMPT_MEMBERS: &str = "Please enter the member roster, separated by commas.";
    pub const PROMPT_PAYMENTS: &str =
        "Please enter the payment log, one line per payment: [payer] paid [amount] for [item].";
    pub const PROMPT_EXCLUSIONS: &str =
        "Please enter exclusions, one per line: [item] excludes [members]. Enter \"none\" to split everything evenly.";
    pub const CONFIRM_SUFFIX: &str = "Is this correct? (yes/no)";
    pub const REPROMPT_CONFIRM: &str =
        "Please answer \"yes\" or \"no\" to confirm the parsed data, or \"reset\" to start over.";
    pub const MANUAL_FALLBACK_INSTRUCTIONS: &str = "The parsed data was rejected repeatedly.\n\
        Please enter the full payload manually, for example:\n\
        [Members]\nAlice, Bob, Charlie\n\
        [Payments]\nAlice paid 100 for dinner\nBob paid 200 for movie\n\
        [Exclusions]\ndinner excludes Charlie\nmovie excludes Alice";
    pub const RETRY_EXHAUSTED_INSTRUCTIONS: &str = "Parsing failed repeatedly.\n\
        Please enter all three sections in one message:\n\
        [Members]\n[Payments]\n[Exclusions]";
    pub const RESULT_HEADER: &str = "Here is the settlement:";
    pub const PARSED_HEADER: &str = "Parsed data:";
    pub const ALREADY_BALANCED: &str = "Already balanced, no transfers needed!";
    pub const SECTION_MEMBERS: &str = "[1. Members]";
    pub const SECTION_PAYMENTS: &str = "[2. Payments]";
    pub const SECTION_SPLITS: &str = "[3. Split Detail]";
    pub const SECTION_SETTLEMENT: &str = "[4. Per-member Settlement]";
    pub const SECTION_TRANSFERS: &str = "[5. Transfers]";
    pub const OVERPAID: &str = "overpaid";
    pub const UNDERPAID: &str = "underpaid";
    pub const DETAIL_CALC: &str = "breakdown";
    pub const LABEL_SEP: &str = ": ";
    pub const PARTICIPANTS: &str = "participants";
    pub const PER_PERSON: &str = "per person";
    pub const CURRENCY_SUFFIX: &str = "";
    pub const CHART_FAILED: &str = "Chart rendering failed; the settlement itself is unaffected.";
    pub const INTERNAL_ERROR: &str = "An error occurred, please retry.";
    pub const MEMBER_JOIN: &str = ", ";
    pub const TABLE_MEMBER: &str = "Member";
    pub const TABLE_PAID: &str = "Paid";
    pub const TABLE_OWED: &str = "Owed";
    pub const TABLE_BALANCE: &str = "Balance";
    pub const TABLE_FROM: &str = "From";
    pub const TABLE_TO: &str = "To";
    pub const TABLE_AMOUNT: &str = "Amount";
}

#[cfg(not(any(feature = "zh", feature = "en")))]
pub mod strings {
    pub const WELCOME: &str = "Hi! I'm your expense-splitting assistant.\n\
        Enter the member roster (separated by commas),\n\
        or everything at once, for example:\n\
        members are Alice, Bob, Charlie\n\
        Alice paid 100 for dinner\n\
        Bob paid 200 for movie\n\
        dinner excludes Charlie\n\
        movie excludes Alice";
    pub const PROMPT_MEMBERS: &str = "Please enter the member roster, separated by commas.";
    pub const PROMPT_PAYMENTS: &str =
        "Please enter the payment log, one line per payment: [payer] paid [amount] for [item].";
    pub const PROMPT_EXCLUSIONS: &str =
        "Please enter exclusions, one per line: [item] excludes [members]. Enter \"none\" to split everything evenly.";
    pub const CONFIRM_SUFFIX: &str = "Is this correct? (yes/no)";
    pub const REPROMPT_CONFIRM: &str =
        "Please answer \"yes\" or \"no\" to confirm the parsed data, or \"reset\" to start over.";
    pub const MANUAL_FALLBACK_INSTRUCTIONS: &str = "The parsed data was rejected repeatedly.\n\
        Please enter the full payload manually, for example:\n\
        [Members]\nAlice, Bob, Charlie\n\
        [Payments]\nAlice paid 100 for dinner\nBob paid 200 for movie\n\
        [Exclusions]\ndinner excludes Charlie\nmovie excludes Alice";
    pub const RETRY_EXHAUSTED_INSTRUCTIONS: &str = "Parsing failed repeatedly.\n\
        Please enter all three sections in one message:\n\
        [Members]\n[Payments]\n[Exclusions]";
    pub const RESULT_HEADER: &str = "Here is the settlement:";
    pub const PARSED_HEADER: &str = "Parsed data:";
    pub const ALREADY_BALANCED: &str = "Already balanced, no transfers needed!";
    pub const SECTION_MEMBERS: &str = "[1. Members]";
    pub const SECTION_PAYMENTS: &str = "[2. Payments]";
    pub const SECTION_SPLITS: &str = "[3. Split Detail]";
    pub const SECTION_SETTLEMENT: &str = "[4. Per-member Settlement]";
    pub const SECTION_TRANSFERS: &str = "[5. Transfers]";
    pub const OVERPAID: &str = "overpaid";
    pub const UNDERPAID: &str = "underpaid";
    pub const DETAIL_CALC: &str = "breakdown";
    pub const LABEL_SEP: &str = ": ";
    pub const PARTICIPANTS: &str = "participants";
    pub const PER_PERSON: &str = "per person";
    pub const CURRENCY_SUFFIX: &str = "";
    pub const CHART_FAILED: &str = "Chart rendering failed; the settlement itself is unaffected.";
    pub const INTERNAL_ERROR: &str = "An error occurred, please retry.";
    pub const MEMBER_JOIN: &str = ", ";
    pub const TABLE_MEMBER: &str = "Member";
    pub const TABLE_PAID: &str = "Paid";
    pub const TABLE_OWED: &str = "Owed";
    pub const TABLE_BALANCE: &str = "Balance";
    pub const TABLE_FROM: &str = "From";
    pub const TABLE_TO: &str = "To";
    pub const TABLE_AMOUNT: &str = "Amount";
}

pub use strings::*;

#[cfg(feature = "zh")]
pub fn duplicate_members(names: impl std::fmt::Display) -> String {
    format!("重複成員：{names}")
}

#[cfg(feature = "zh")]
pub fn empty_member_list() -> String {
    "成員名單不得為空。".to_string()
}

#[cfg(feature = "zh")]
pub fn malformed_payment_line(line: usize, detail: impl std::fmt::Display) -> String {
    format!("第 {line} 行格式錯誤：{detail}")
}

#[cfg(feature = "zh")]
pub fn invalid_amount(line: usize, raw: impl std::fmt::Display) -> String {
    format!("第 {line} 行金額格式錯誤：{raw}")
}

#[cfg(feature = "zh")]
pub fn unknown_payer(name: impl std::fmt::Display, line: usize) -> String {
    format!("第 {line} 行付款人 '{name}' 不在成員名單中。")
}

#[cfg(feature = "zh")]
pub fn unknown_item(item: impl std::fmt::Display, line: usize) -> String {
    format!("第 {line} 行無此項目：{item}")
}

#[cfg(feature = "zh")]
pub fn missing_sections(names: impl std::fmt::Display) -> String {
    format!("以下段落缺失或格式錯誤：{names}\n請檢查輸入內容並重試。")
}

#[cfg(feature = "zh")]
pub fn chart_ready(url: impl std::fmt::Display) -> String {
    format!("圖表生成完畢！您可以從以下連結查看圖表：\n{url}")
}

#[cfg(feature = "zh")]
pub fn payment_log_line(
    payer: impl std::fmt::Display,
    amount: impl std::fmt::Display,
    item: impl std::fmt::Display,
) -> String {
    format!("{payer}付了${amount}({item})")
}

#[cfg(feature = "zh")]
pub fn transfer_line(
    from: impl std::fmt::Display,
    to: impl std::fmt::Display,
    amount: impl std::fmt::Display,
) -> String {
    format!("{from} → {to} {amount} 元")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn duplicate_members(names: impl std::fmt::Display) -> String {
    format!("Duplicate members: {names}")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn empty_member_list() -> String {
    "The member roster must not be empty.".to_string()
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn malformed_payment_line(line: usize, detail: impl std::fmt::Display) -> String {
    format!("Malformed payment at line {line}: {detail}")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn invalid_amount(line: usize, raw: impl std::fmt::Display) -> String {
    format!("Invalid amount '{raw}' at line {line}")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn unknown_payer(name: impl std::fmt::Display, line: usize) -> String {
    format!("Payer '{name}' at line {line} is not in the member roster.")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn unknown_item(item: impl std::fmt::Display, line: usize) -> String {
    format!("Unknown item '{item}' at line {line}.")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn missing_sections(names: impl std::fmt::Display) -> String {
    format!("The following sections are missing or malformed: {names}\nPlease check the input and retry.")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn chart_ready(url: impl std::fmt::Display) -> String {
    format!("Chart ready! View it here:\n{url}")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn payment_log_line(
    payer: impl std::fmt::Display,
    amount: impl std::fmt::Display,
    item: impl std::fmt::Display,
) -> String {
    format!("{payer} paid ${amount} ({item})")
}

#[cfg(any(feature = "en", not(any(feature = "zh", feature = "en"))))]
pub fn transfer_line(
    from: impl std::fmt::Display,
    to: impl std::fmt::Display,
    amount: impl std::fmt::Display,
) -> String {
    format!("{from} → {to} {amount}")
}

/// Token recognition is bilingual regardless of the active catalog, the same
/// way the line grammar accepts both surface languages.
pub fn is_yes(text: &str) -> bool {
    let t = text.trim();
    t.eq_ignore_ascii_case("yes") || t.eq_ignore_ascii_case("y") || t == "是"
}

pub fn is_no(text: &str) -> bool {
    let t = text.trim();
    t.eq_ignore_ascii_case("no") || t.eq_ignore_ascii_case("n") || t == "否"
}

pub fn is_reset(text: &str) -> bool {
    let t = text.trim();
    t.eq_ignore_ascii_case("reset") || t == "重置"
}
