//! Dashboard label sets.
//!
//! Label tables are immutable statics; lookup by tag never fails and falls
//! back to English for anything unrecognised.

/// All user-visible labels for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale {
    pub tag: &'static str,
    pub processes_title: &'static str,
    pub active_processes: &'static str,
    pub idle_processes: &'static str,
    pub pool_load_title: &'static str,
    pub rps_title: &'static str,
    pub avg_duration_title: &'static str,
    pub slow_requests_title: &'static str,
    pub slow_requests_text: &'static str,
    pub info_title: &'static str,
    pub total_processes: &'static str,
    pub queue_length: &'static str,
    pub max_children: &'static str,
    pub uptime: &'static str,
    pub accepted_connections: &'static str,
    pub pool: &'static str,
    pub process_manager: &'static str,
    pub loading: &'static str,
    pub exit: &'static str,
    /// Prefix of the help-line notice shown while fetches fail.
    pub fetch_failing: &'static str,
}

pub static EN: Locale = Locale {
    tag: "en",
    processes_title: "Active/Idle Processes",
    active_processes: "Active",
    idle_processes: "Idle",
    pool_load_title: "Pool Load %",
    rps_title: "Requests/sec",
    avg_duration_title: "Avg Request Duration (ms)",
    slow_requests_title: "Slow Requests",
    slow_requests_text: "slow requests",
    info_title: "Pool Info",
    total_processes: "Total Processes",
    queue_length: "Queue Length",
    max_children: "Max Children Reached",
    uptime: "Uptime",
    accepted_connections: "Accepted Connections",
    pool: "Pool",
    process_manager: "Process Manager",
    loading: "Loading...",
    exit: "Press 'q' or Ctrl+C to quit",
    fetch_failing: "Fetch failing",
};

pub static RU: Locale = Locale {
    tag: "ru",
    processes_title: "Активные/Свободные Процессы",
    active_processes: "Активные",
    idle_processes: "Свободные",
    pool_load_title: "Загрузка Пула %",
    rps_title: "Запросов/сек",
    avg_duration_title: "Среднее Время Запроса (мс)",
    slow_requests_title: "Медленные Запросы",
    slow_requests_text: "медленных запросов",
    info_title: "Информация о Пуле",
    total_processes: "Всего Процессов",
    queue_length: "Длина Очереди",
    max_children: "Достигнут Макс. Лимит",
    uptime: "Время Работы",
    accepted_connections: "Принято Соединений",
    pool: "Пул",
    process_manager: "Менеджер Процессов",
    loading: "Загрузка...",
    exit: "Нажмите 'q' или Ctrl+C для выхода",
    fetch_failing: "Ошибка запроса",
};

static LOCALES: [&Locale; 2] = [&EN, &RU];

impl Locale {
    /// Look up a label set by tag, falling back to English.
    pub fn for_tag(tag: &str) -> &'static Locale {
        Self::find(tag).unwrap_or(&EN)
    }

    /// Exact lookup; `None` for unrecognised tags.
    pub fn find(tag: &str) -> Option<&'static Locale> {
        LOCALES.iter().copied().find(|l| l.tag == tag)
    }

    /// Tags of every built-in label set.
    pub fn supported() -> impl Iterator<Item = &'static str> {
        LOCALES.iter().map(|l| l.tag)
    }
}
