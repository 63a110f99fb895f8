//! Fold and strip tables used by the canonicalization pipeline.
//!
//! Everything in here is fixed domain data transcribed from the register's
//! normalization conventions. The pipeline in the parent module applies these
//! tables in a strict order; none of them are configurable at runtime.

use std::cmp::Reverse;
use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Dash and long-vowel glyphs collapsed to the canonical ASCII hyphen.
pub(super) const DASHES: &[char] = &[
    'ー', 'ｰ', '−', '–', '—', '―', '‐', '‑', '‒', '﹘', '－',
];

/// Decorative symbols removed under every profile.
pub(super) const DECORATIVE: &[char] = &[
    '☆', '★', '○', '●', '◎', '◇', '◆', '□', '■', '△', '▲', '▽', '▼',
    '※', '〓', '〒', '→', '←', '↑', '↓', '＊', '*', '†', '‡', '°', '§',
];

/// Additional noise removed under the basic, phonetic and party-name
/// profiles. The display profile keeps the two-row separator, the middle dot
/// and the ampersand because registered marks distinguish by them.
pub(super) const BASIC_EXTRA_NOISE: &[char] = &[
    '＼', '\\', '／', '/', '・', '･', '＆', '&', '＠', '@', '＃', '#',
];

/// Noise removed under the display profile on top of [`DECORATIVE`].
pub(super) const DISPLAY_EXTRA_NOISE: &[char] = &['／', '/', '＠', '@', '＃', '#'];

/// Punctuation and quote glyphs removed under every profile, both widths.
pub(super) const PUNCTUATION: &[char] = &[
    '、', '。', '，', '．', ',', '.', '「', '」', '『', '』', '【', '】',
    '〔', '〕', '〈', '〉', '《', '》', '(', ')', '（', '）', '[', ']',
    '［', '］', '{', '}', '｛', '｝', '"', '\'', '“', '”', '‘', '’',
    '＂', '＇', '´', '`', '｀', '¨', '^', '＾', '~', '〜', '～', '!',
    '！', '?', '？', ';', '；', ':', '：', '｜', '|', '＿', '_', '゛',
    '゜', '\u{3099}', '\u{309A}',
];

/// Half-width katakana (and the half-width punctuation sharing the block)
/// mapped to their full-width forms. Voicing marks map to the standalone
/// combining glyphs and are merged into the preceding base by the caller.
pub(super) static HALFWIDTH_KANA: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [
        ('｡', '。'), ('｢', '「'), ('｣', '」'), ('､', '、'), ('･', '・'),
        ('ｦ', 'ヲ'), ('ｧ', 'ァ'), ('ｨ', 'ィ'), ('ｩ', 'ゥ'), ('ｪ', 'ェ'),
        ('ｫ', 'ォ'), ('ｬ', 'ャ'), ('ｭ', 'ュ'), ('ｮ', 'ョ'), ('ｯ', 'ッ'),
        ('ｰ', 'ー'), ('ｱ', 'ア'), ('ｲ', 'イ'), ('ｳ', 'ウ'), ('ｴ', 'エ'),
        ('ｵ', 'オ'), ('ｶ', 'カ'), ('ｷ', 'キ'), ('ｸ', 'ク'), ('ｹ', 'ケ'),
        ('ｺ', 'コ'), ('ｻ', 'サ'), ('ｼ', 'シ'), ('ｽ', 'ス'), ('ｾ', 'セ'),
        ('ｿ', 'ソ'), ('ﾀ', 'タ'), ('ﾁ', 'チ'), ('ﾂ', 'ツ'), ('ﾃ', 'テ'),
        ('ﾄ', 'ト'), ('ﾅ', 'ナ'), ('ﾆ', 'ニ'), ('ﾇ', 'ヌ'), ('ﾈ', 'ネ'),
        ('ﾉ', 'ノ'), ('ﾊ', 'ハ'), ('ﾋ', 'ヒ'), ('ﾌ', 'フ'), ('ﾍ', 'ヘ'),
        ('ﾎ', 'ホ'), ('ﾏ', 'マ'), ('ﾐ', 'ミ'), ('ﾑ', 'ム'), ('ﾒ', 'メ'),
        ('ﾓ', 'モ'), ('ﾔ', 'ヤ'), ('ﾕ', 'ユ'), ('ﾖ', 'ヨ'), ('ﾗ', 'ラ'),
        ('ﾘ', 'リ'), ('ﾙ', 'ル'), ('ﾚ', 'レ'), ('ﾛ', 'ロ'), ('ﾜ', 'ワ'),
        ('ﾝ', 'ン'), ('ﾞ', '゛'), ('ﾟ', '゜'),
    ]
    .into_iter()
    .collect()
});

/// Plain kana to its voiced (dakuten) counterpart.
pub(super) static VOICED: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [
        ('カ', 'ガ'), ('キ', 'ギ'), ('ク', 'グ'), ('ケ', 'ゲ'), ('コ', 'ゴ'),
        ('サ', 'ザ'), ('シ', 'ジ'), ('ス', 'ズ'), ('セ', 'ゼ'), ('ソ', 'ゾ'),
        ('タ', 'ダ'), ('チ', 'ヂ'), ('ツ', 'ヅ'), ('テ', 'デ'), ('ト', 'ド'),
        ('ハ', 'バ'), ('ヒ', 'ビ'), ('フ', 'ブ'), ('ヘ', 'ベ'), ('ホ', 'ボ'),
        ('ウ', 'ヴ'),
    ]
    .into_iter()
    .collect()
});

/// Plain kana to its semi-voiced (handakuten) counterpart.
pub(super) static SEMI_VOICED: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [('ハ', 'パ'), ('ヒ', 'ピ'), ('フ', 'プ'), ('ヘ', 'ペ'), ('ホ', 'ポ')]
        .into_iter()
        .collect()
});

/// Greek letters and accented Latin letters folded to ASCII. Lower-case
/// forms never reach this table; the width/case fold runs first.
pub(super) static LETTER_VARIANTS: Lazy<HashMap<char, &'static str>> = Lazy::new(|| {
    [
        ('Α', "A"), ('Β', "B"), ('Γ', "G"), ('Δ', "D"), ('Ε', "E"),
        ('Ζ', "Z"), ('Η', "H"), ('Θ', "TH"), ('Ι', "I"), ('Κ', "K"),
        ('Λ', "L"), ('Μ', "M"), ('Ν', "N"), ('Ξ', "X"), ('Ο', "O"),
        ('Π', "P"), ('Ρ', "R"), ('Σ', "S"), ('Τ', "T"), ('Υ', "Y"),
        ('Φ', "PH"), ('Χ', "X"), ('Ψ', "PS"), ('Ω', "O"),
        ('À', "A"), ('Á', "A"), ('Â', "A"), ('Ã', "A"), ('Ä', "A"),
        ('Å', "A"), ('Ā', "A"), ('Æ', "AE"), ('Ç', "C"), ('È', "E"),
        ('É', "E"), ('Ê', "E"), ('Ë', "E"), ('Ē', "E"), ('Ì', "I"),
        ('Í', "I"), ('Î', "I"), ('Ï', "I"), ('Ī', "I"), ('Ð', "D"),
        ('Ñ', "N"), ('Ò', "O"), ('Ó', "O"), ('Ô', "O"), ('Õ', "O"),
        ('Ö', "O"), ('Ø', "O"), ('Ō', "O"), ('Œ', "OE"), ('Š', "S"),
        ('Ù', "U"), ('Ú', "U"), ('Û', "U"), ('Ü', "U"), ('Ū', "U"),
        ('Ý', "Y"), ('Þ', "TH"), ('Ž', "Z"),
    ]
    .into_iter()
    .collect()
});

/// Pre-reform ideographs folded to their modern forms.
pub(super) static LEGACY_IDEOGRAPHS: Lazy<HashMap<char, char>> = Lazy::new(|| {
    [
        ('亞', '亜'), ('惡', '悪'), ('壓', '圧'), ('圍', '囲'), ('爲', '為'),
        ('醫', '医'), ('壹', '壱'), ('榮', '栄'), ('營', '営'), ('驛', '駅'),
        ('圓', '円'), ('鹽', '塩'), ('應', '応'), ('櫻', '桜'), ('奧', '奥'),
        ('橫', '横'), ('歐', '欧'), ('黃', '黄'), ('溫', '温'), ('價', '価'),
        ('畫', '画'), ('會', '会'), ('壞', '壊'), ('懷', '懐'), ('繪', '絵'),
        ('覺', '覚'), ('學', '学'), ('樂', '楽'), ('觀', '観'), ('氣', '気'),
        ('歸', '帰'), ('舊', '旧'), ('據', '拠'), ('擧', '挙'), ('峽', '峡'),
        ('狹', '狭'), ('惠', '恵'), ('鷄', '鶏'), ('藝', '芸'), ('缺', '欠'),
        ('劍', '剣'), ('檢', '検'), ('顯', '顕'), ('驗', '験'), ('嚴', '厳'),
        ('廣', '広'), ('國', '国'), ('濟', '済'), ('齋', '斎'), ('劑', '剤'),
        ('雜', '雑'), ('兒', '児'), ('實', '実'), ('寫', '写'), ('壽', '寿'),
        ('收', '収'), ('從', '従'), ('澁', '渋'), ('獸', '獣'), ('縱', '縦'),
        ('燒', '焼'), ('證', '証'), ('乘', '乗'), ('條', '条'), ('淨', '浄'),
        ('疊', '畳'), ('稱', '称'), ('眞', '真'), ('盡', '尽'), ('圖', '図'),
        ('粹', '粋'), ('醉', '酔'), ('聲', '声'), ('淺', '浅'), ('錢', '銭'),
        ('禪', '禅'), ('曾', '曽'), ('爭', '争'), ('總', '総'), ('莊', '荘'),
        ('裝', '装'), ('藏', '蔵'), ('贊', '賛'), ('殘', '残'), ('齒', '歯'),
        ('濱', '浜'), ('拂', '払'), ('佛', '仏'), ('變', '変'), ('邊', '辺'),
        ('辨', '弁'), ('瓣', '弁'), ('辯', '弁'), ('寶', '宝'), ('豐', '豊'),
        ('萬', '万'), ('滿', '満'), ('彌', '弥'), ('藥', '薬'), ('譯', '訳'),
        ('豫', '予'), ('餘', '余'), ('與', '与'), ('譽', '誉'), ('搖', '揺'),
        ('樣', '様'), ('來', '来'), ('賴', '頼'), ('亂', '乱'), ('覽', '覧'),
        ('龍', '竜'), ('壘', '塁'), ('淚', '涙'), ('勵', '励'), ('禮', '礼'),
        ('靈', '霊'), ('爐', '炉'), ('勞', '労'), ('樓', '楼'), ('郞', '郎'),
        ('錄', '録'), ('灣', '湾'), ('澤', '沢'), ('廳', '庁'), ('體', '体'),
        ('臺', '台'), ('鐵', '鉄'), ('轉', '転'), ('傳', '伝'), ('燈', '灯'),
        ('點', '点'), ('當', '当'), ('黨', '党'), ('獨', '独'), ('讀', '読'),
        ('賣', '売'), ('發', '発'), ('拜', '拝'), ('廢', '廃'), ('麥', '麦'),
        ('拔', '抜'), ('濕', '湿'), ('釋', '釈'), ('號', '号'), ('效', '効'),
        ('單', '単'), ('團', '団'), ('斷', '断'), ('晝', '昼'), ('蟲', '虫'),
        ('廰', '庁'), ('鬪', '闘'), ('寳', '宝'), ('惱', '悩'), ('腦', '脳'),
    ]
    .into_iter()
    .collect()
});

/// Roman numeral glyphs expanded to decimal digit strings. Lower-case glyphs
/// reach here already upper-cased.
pub(super) const ROMAN_NUMERALS: &[(char, &str)] = &[
    ('Ⅰ', "1"), ('Ⅱ', "2"), ('Ⅲ', "3"), ('Ⅳ', "4"), ('Ⅴ', "5"),
    ('Ⅵ', "6"), ('Ⅶ', "7"), ('Ⅷ', "8"), ('Ⅸ', "9"), ('Ⅹ', "10"),
    ('Ⅺ', "11"), ('Ⅻ', "12"), ('Ⅼ', "50"), ('Ⅽ', "100"), ('Ⅾ', "500"),
    ('Ⅿ', "1000"),
];

/// Single-character phonetic mergers applied before the subtle-sound table.
pub(super) const PHONETIC_MERGERS: &[(char, char)] = &[
    ('ヂ', 'ジ'), ('ヅ', 'ズ'), ('ヰ', 'イ'), ('ヱ', 'エ'), ('ヲ', 'オ'),
];

const SUBTLE_SOUND_ENTRIES: &[(&str, &str)] = &[
    ("ヴァ", "バ"), ("ヴィ", "ビ"), ("ヴェ", "ベ"), ("ヴォ", "ボ"),
    ("ヴュ", "ビユ"), ("ティ", "チ"), ("ディ", "ジ"), ("デュ", "ジユ"),
    ("テュ", "チユ"), ("トゥ", "ツ"), ("ドゥ", "ズ"), ("ツィ", "チ"),
    ("スィ", "シ"), ("ズィ", "ジ"), ("クヮ", "カ"), ("グヮ", "ガ"),
    ("ヴ", "ブ"),
];

/// Subtle-sound substitutions, longest pattern first. A longer pattern must
/// win over any shorter pattern it contains (ヴァ before ヴ), so the table is
/// sorted by pattern length at initialization.
pub(super) static SUBTLE_SOUNDS: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    let mut entries = SUBTLE_SOUND_ENTRIES.to_vec();
    entries.sort_by_key(|(pattern, _)| Reverse(pattern.chars().count()));
    entries
});

/// Long-vowel digraphs contracted under the phonetic profile. The dash fold
/// has already run, so the replacement carries the ASCII hyphen.
pub(super) const LONG_VOWEL_DIGRAPHS: &[(&str, &str)] = &[("エイ", "エ-"), ("オウ", "オ-")];

/// Small (contracted-sound) kana raised to full size under the phonetic
/// profile. The glottal stop ッ is deliberately absent; sokuon distinctions
/// survive canonicalization.
pub(super) const SMALL_KANA: &[(char, char)] = &[
    ('ァ', 'ア'), ('ィ', 'イ'), ('ゥ', 'ウ'), ('ェ', 'エ'), ('ォ', 'オ'),
    ('ャ', 'ヤ'), ('ュ', 'ユ'), ('ョ', 'ヨ'), ('ヮ', 'ワ'), ('ヵ', 'カ'),
    ('ヶ', 'ケ'),
];

const ENTITY_SUFFIX_ENTRIES: &[&str] = &[
    // Japanese corporate forms, current and pre-reform spellings.
    "株式会社", "株式會社", "有限会社", "有限會社", "合名会社", "合名會社",
    "合資会社", "合資會社", "合同会社", "合同會社", "相互会社", "相互會社",
    "一般社団法人", "一般財団法人", "公益社団法人", "公益財団法人",
    "社団法人", "財団法人", "財團法人", "独立行政法人", "国立研究開発法人",
    "地方独立行政法人", "国立大学法人", "公立大学法人", "学校法人", "學校法人",
    "医療法人社団", "医療法人財団", "医療法人", "醫療法人", "社会福祉法人",
    "宗教法人", "特定非営利活動法人", "有限責任事業組合", "有限責任中間法人",
    "中間法人", "農業協同組合", "漁業協同組合", "生活協同組合", "事業協同組合",
    "協同組合", "企業組合", "商工組合", "信用金庫", "信用組合", "労働金庫",
    "税理士法人", "弁護士法人", "行政書士法人", "司法書士法人", "監査法人",
    "(株)", "(有)", "(合)", "(名)", "(資)",
    // Romanized Japanese forms.
    "KABUSHIKIKAISHA", "KABUSHIKIGAISHA", "YUGENKAISHA", "YUGENGAISHA",
    "GODOKAISHA", "GOMEIKAISHA", "GOSHIKAISHA", "K.K.",
    // Latin-script corporate forms.
    "CO.,LTD.", "CO.,LTD", "CO.LTD.", "CO.LTD", "COMPANY,LIMITED",
    "COMPANYLIMITED", "CORPORATION", "CORP.", "CORP", "INCORPORATED",
    "INC.", "INC", "LIMITED", "LTD.", "LTD", "LTDA", "L.L.C.", "LLC",
    "L.L.P.", "LLP", "L.P.", "P.L.C.", "PLC", "PTY.LTD.", "PTY.LTD",
    "PTE.LTD.", "PTE.LTD", "GMBH&CO.KG", "GMBH", "AKTIENGESELLSCHAFT",
    "A.G.", "AG", "K.G.", "KG", "S.A.R.L.", "SARL", "S.A.S.", "S.A.",
    "SA", "S.P.A.", "S.R.L.", "SRL", "N.V.", "NV", "B.V.", "BV",
    "A.B.", "AB", "A/S", "APS", "OYJ", "OY",
];

/// Legal-entity suffix phrases, longest first. Entries are stored in the
/// match fold (ASCII width, upper case, no interior whitespace); raw input is
/// folded the same way during comparison.
pub(super) static ENTITY_SUFFIXES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut entries = ENTITY_SUFFIX_ENTRIES.to_vec();
    entries.sort_by_key(|suffix| Reverse(suffix.chars().count()));
    entries
});
