/// 预订引擎配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LOCK_TTL_MS | 10000 | 租约存活时间(毫秒) |
/// | LOCK_RETRY_INTERVAL_MS | 100 | 获取租约重试间隔(毫秒) |
/// | LOCK_MAX_ATTEMPTS | 20 | 获取租约总尝试次数 |
/// | ADMISSION_POLICY | deferred | 准入策略: immediate \| deferred |
/// | ALLOW_OVERBOOK_OVERRIDE | true | 确认时允许强制排桌(超订) |
/// | NOTIFY_QUEUE_CAPACITY | 1024 | 通知队列容量 |
/// | NOTIFY_MAX_ATTEMPTS | 3 | 通知投递尝试次数 |
/// | NOTIFY_RETRY_BASE_MS | 1000 | 通知重试初始退避(毫秒) |
/// | DEFAULT_BOOKING_DURATION_MIN | 120 | 默认就餐时长(分钟) |
///
/// # 示例
///
/// ```ignore
/// ADMISSION_POLICY=immediate LOCK_MAX_ATTEMPTS=10 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// 租约 TTL — 必须明显大于准入临界区的预期耗时
    pub lock_ttl_ms: u64,
    /// 获取租约失败后的重试间隔
    pub lock_retry_interval_ms: u64,
    /// 获取租约的总尝试次数，耗尽后返回 LOCK_CONTENTION
    pub lock_max_attempts: u32,
    /// 准入策略 (见 [`AdmissionPolicy`])
    pub admission_policy: AdmissionPolicy,
    /// 确认无空桌时是否允许强制排桌 (显式超订通道)
    pub allow_overbook_override: bool,
    /// 通知队列容量 (队列满时事件丢弃并告警)
    pub notify_queue_capacity: usize,
    /// 通知投递最大尝试次数
    pub notify_max_attempts: u32,
    /// 通知重试初始退避，指数递增
    pub notify_retry_base_ms: u64,
    /// date+time 构造窗口时的默认时长
    pub default_duration_min: i64,
}

/// 准入策略
///
/// 两种模式都是合法部署选择，权衡在于一致性与业务灵活性：
///
/// - `Immediate`: 无空桌直接拒绝，创建即绑定桌台 (CONFIRMED)。
///   严格保证同桌不重叠，但满座期间丢失客流。
/// - `Deferred`: 创建永远成功 (PENDING 不绑桌)，店主确认时再排桌，
///   并可显式超订。生产环境默认此模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionPolicy {
    Immediate,
    Deferred,
}

impl AdmissionPolicy {
    /// 解析策略名 (大小写不敏感)，未知值返回 None
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "immediate" => Some(AdmissionPolicy::Immediate),
            "deferred" => Some(AdmissionPolicy::Deferred),
            _ => None,
        }
    }
}

impl BookingConfig {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            lock_ttl_ms: std::env::var("LOCK_TTL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            lock_retry_interval_ms: std::env::var("LOCK_RETRY_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(100),
            lock_max_attempts: std::env::var("LOCK_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(20),
            admission_policy: std::env::var("ADMISSION_POLICY")
                .ok()
                .and_then(|v| {
                    let parsed = AdmissionPolicy::parse(&v);
                    if parsed.is_none() {
                        tracing::warn!(value = %v, "Unknown ADMISSION_POLICY, falling back to deferred");
                    }
                    parsed
                })
                .unwrap_or(AdmissionPolicy::Deferred),
            allow_overbook_override: std::env::var("ALLOW_OVERBOOK_OVERRIDE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            notify_queue_capacity: std::env::var("NOTIFY_QUEUE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            notify_max_attempts: std::env::var("NOTIFY_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),
            notify_retry_base_ms: std::env::var("NOTIFY_RETRY_BASE_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            default_duration_min: std::env::var("DEFAULT_BOOKING_DURATION_MIN")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(120),
        }
    }

    /// 使用自定义租约参数覆盖部分配置
    ///
    /// 常用于测试场景 (短重试间隔避免拖慢测试)
    pub fn with_overrides(
        policy: AdmissionPolicy,
        lock_retry_interval_ms: u64,
        lock_max_attempts: u32,
    ) -> Self {
        let mut config = Self::from_env();
        config.admission_policy = policy;
        config.lock_retry_interval_ms = lock_retry_interval_ms;
        config.lock_max_attempts = lock_max_attempts;
        config
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
