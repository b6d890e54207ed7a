//! Static lookup tables. Fragments are stored folded (lower case, `ё` → `е`)
//! and are matched as substrings of folded text; earlier entries win.

use hearth_core::category::{FOOD, TRANSFER};

/// Known merchant name fragments → canonical brand name.
pub const BRANDS: &[(&str, &str)] = &[
    ("пятерочка", "Пятерочка"),
    ("pyaterochka", "Пятерочка"),
    ("перекресток", "Перекресток"),
    ("perekrestok", "Перекресток"),
    ("магнит", "Магнит"),
    ("magnit", "Магнит"),
    ("вкусвилл", "ВкусВилл"),
    ("vkusvill", "ВкусВилл"),
    ("ашан", "Ашан"),
    ("auchan", "Ашан"),
    ("лента", "Лента"),
    ("lenta", "Лента"),
    ("дикси", "Дикси"),
    ("dixy", "Дикси"),
    ("самокат", "Самокат"),
    ("samokat", "Самокат"),
    ("вкусно и точка", "Вкусно и точка"),
    ("vkusno i tochka", "Вкусно и точка"),
    ("mcdonald", "McDonald's"),
    ("макдоналдс", "McDonald's"),
    ("burger king", "Burger King"),
    ("бургер кинг", "Burger King"),
    ("kfc", "KFC"),
    ("rostics", "Rostic's"),
    ("starbucks", "Starbucks"),
    ("шоколадница", "Шоколадница"),
    ("yandex.taxi", "Яндекс Такси"),
    ("yandex taxi", "Яндекс Такси"),
    ("яндекс такси", "Яндекс Такси"),
    ("yandex.go", "Яндекс Go"),
    ("yandex go", "Яндекс Go"),
    ("яндекс еда", "Яндекс Еда"),
    ("eda.yandex", "Яндекс Еда"),
    ("кинопоиск", "Кинопоиск"),
    ("kinopoisk", "Кинопоиск"),
    ("uber", "Uber"),
    ("ozon", "Ozon"),
    ("озон", "Ozon"),
    ("wildberries", "Wildberries"),
    ("вайлдберриз", "Wildberries"),
    ("aliexpress", "AliExpress"),
    ("ikea", "IKEA"),
    ("leroy merlin", "Леруа Мерлен"),
    ("леруа мерлен", "Леруа Мерлен"),
    ("м.видео", "М.Видео"),
    ("mvideo", "М.Видео"),
    ("lukoil", "Лукойл"),
    ("лукойл", "Лукойл"),
    ("роснефть", "Роснефть"),
    ("rosneft", "Роснефть"),
    ("газпромнефть", "Газпромнефть"),
    ("gazpromneft", "Газпромнефть"),
    ("аэрофлот", "Аэрофлот"),
    ("aeroflot", "Аэрофлот"),
    ("билайн", "Билайн"),
    ("beeline", "Билайн"),
    ("мегафон", "МегаФон"),
    ("megafon", "МегаФон"),
    ("tele2", "Tele2"),
    ("netflix", "Netflix"),
    ("spotify", "Spotify"),
    ("steampowered", "Steam"),
    ("apple.com", "Apple"),
    ("google", "Google"),
];

/// Folded text fragments → category id.
pub const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("пятерочка", FOOD),
    ("перекресток", FOOD),
    ("магнит", FOOD),
    ("вкусвилл", FOOD),
    ("ашан", FOOD),
    ("лента", FOOD),
    ("дикси", FOOD),
    ("самокат", FOOD),
    ("продукт", FOOD),
    ("супермаркет", FOOD),
    ("pyaterochka", FOOD),
    ("perekrestok", FOOD),
    ("magnit", FOOD),
    ("vkusvill", FOOD),
    ("auchan", FOOD),
    ("lenta", FOOD),
    ("grocery", FOOD),
    ("supermarket", FOOD),
    ("кафе", "cafe"),
    ("ресторан", "cafe"),
    ("кофе", "cafe"),
    ("coffee", "cafe"),
    ("cafe", "cafe"),
    ("restaurant", "cafe"),
    ("mcdonald", "cafe"),
    ("вкусно и точка", "cafe"),
    ("burger", "cafe"),
    ("бургер", "cafe"),
    ("kfc", "cafe"),
    ("starbucks", "cafe"),
    ("шоколадница", "cafe"),
    ("яндекс еда", "cafe"),
    ("такси", "transport"),
    ("taxi", "transport"),
    ("uber", "transport"),
    ("yandex go", "transport"),
    ("метро", "transport"),
    ("metro", "transport"),
    ("транспорт", "transport"),
    ("азс", "transport"),
    ("лукойл", "transport"),
    ("роснефть", "transport"),
    ("газпромнефть", "transport"),
    ("аэрофлот", "transport"),
    ("ржд", "transport"),
    ("аптека", "health"),
    ("apteka", "health"),
    ("pharm", "health"),
    ("клиника", "health"),
    ("clinic", "health"),
    ("стоматолог", "health"),
    ("ozon", "shopping"),
    ("wildberries", "shopping"),
    ("aliexpress", "shopping"),
    ("ikea", "shopping"),
    ("леруа мерлен", "shopping"),
    ("м.видео", "shopping"),
    ("одежда", "shopping"),
    ("кинопоиск", "entertainment"),
    ("кино", "entertainment"),
    ("cinema", "entertainment"),
    ("netflix", "entertainment"),
    ("spotify", "entertainment"),
    ("steam", "entertainment"),
    ("театр", "entertainment"),
    ("жкх", "utilities"),
    ("коммунальн", "utilities"),
    ("электроэнерг", "utilities"),
    ("водоканал", "utilities"),
    ("мосэнерго", "utilities"),
    ("билайн", "communication"),
    ("мегафон", "communication"),
    ("tele2", "communication"),
    ("мтс", "communication"),
    ("интернет", "communication"),
    ("ростелеком", "communication"),
    ("зарплат", "salary"),
    ("salary", "salary"),
];

/// Merchant category codes → category id.
pub const MCC_CATEGORIES: &[(u16, &str)] = &[
    (5411, FOOD),
    (5422, FOOD),
    (5441, FOOD),
    (5451, FOOD),
    (5462, FOOD),
    (5499, FOOD),
    (5812, "cafe"),
    (5813, "cafe"),
    (5814, "cafe"),
    (4111, "transport"),
    (4112, "transport"),
    (4121, "transport"),
    (4131, "transport"),
    (4511, "transport"),
    (5541, "transport"),
    (5542, "transport"),
    (7523, "transport"),
    (5912, "health"),
    (8011, "health"),
    (8021, "health"),
    (8062, "health"),
    (8099, "health"),
    (5311, "shopping"),
    (5331, "shopping"),
    (5651, "shopping"),
    (5691, "shopping"),
    (5732, "shopping"),
    (5945, "shopping"),
    (5999, "shopping"),
    (7832, "entertainment"),
    (7922, "entertainment"),
    (7996, "entertainment"),
    (5815, "entertainment"),
    (5816, "entertainment"),
    (4814, "communication"),
    (4899, "communication"),
    (4900, "utilities"),
    (4829, TRANSFER),
    (6536, TRANSFER),
    (6538, TRANSFER),
];

/// Category labels used by banks in their own exports → category id.
pub const BANK_CATEGORY_LABELS: &[(&str, &str)] = &[
    ("супермаркет", FOOD),
    ("продукт", FOOD),
    ("groceries", FOOD),
    ("ресторан", "cafe"),
    ("фастфуд", "cafe"),
    ("кафе", "cafe"),
    ("такси", "transport"),
    ("транспорт", "transport"),
    ("топливо", "transport"),
    ("авиабилет", "transport"),
    ("ж/д билет", "transport"),
    ("аптек", "health"),
    ("медицин", "health"),
    ("здоровье", "health"),
    ("одежда", "shopping"),
    ("маркетплейс", "shopping"),
    ("электроника", "shopping"),
    ("дом и ремонт", "shopping"),
    ("развлечени", "entertainment"),
    ("кино", "entertainment"),
    ("цифровые товары", "entertainment"),
    ("жкх", "utilities"),
    ("коммунальн", "utilities"),
    ("мобильная связь", "communication"),
    ("связь", "communication"),
    ("переводы", TRANSFER),
    ("перевод", TRANSFER),
    ("зарплата", "salary"),
];

pub fn mcc_category(code: u16) -> Option<&'static str> {
    MCC_CATEGORIES
        .iter()
        .find(|(mcc, _)| *mcc == code)
        .map(|(_, category)| *category)
}
