use clap::ValueEnum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Locale {
    En,
    #[default]
    Vi,
}

/// Every piece of player-facing text.
#[derive(Debug)]
pub struct Strings {
    pub app_title: &'static str,
    pub loading: &'static str,
    pub claim_prize_title: &'static str,
    pub form_subtitle: &'static str,
    pub email_label: &'static str,
    pub email_placeholder: &'static str,
    pub email_error: &'static str,
    pub phone_label: &'static str,
    pub phone_placeholder: &'static str,
    pub phone_error: &'static str,
    pub submit_info: &'static str,
    pub spin: &'static str,
    pub spinning: &'static str,
    pub congratulations: &'static str,
    pub you_won: &'static str,
    pub result_followup: &'static str,
    pub chances_title: &'static str,
    pub form_help: &'static str,
    pub wheel_help: &'static str,
    pub result_help: &'static str,
}

const EN: Strings = Strings {
    app_title: "Spinning Wheel",
    loading: "Loading...",
    claim_prize_title: "Claim Your Prize!",
    form_subtitle: "Enter your info to claim your prize",
    email_label: "Email (optional)",
    email_placeholder: "you@example.com",
    email_error: "Please enter a valid email address.",
    phone_label: "Phone Number",
    phone_placeholder: "+1 234 567 8900",
    phone_error: "Please enter a valid phone number.",
    submit_info: "Claim Prize!",
    spin: "SPIN!",
    spinning: "Spinning...",
    congratulations: "Congratulations!",
    you_won: "You won:",
    result_followup: "We will contact you shortly about your prize. Thank you!",
    chances_title: "Prizes",
    form_help: "Tab switch field | Enter submit | F2 language | Esc quit",
    wheel_help: "Space/Enter spin | l language | q quit",
    result_help: "Enter continue | l language | q quit",
};

const VI: Strings = Strings {
    app_title: "Vòng Quay May Mắn",
    loading: "Đang tải...",
    claim_prize_title: "Nhận giải thưởng!",
    form_subtitle: "Nhập thông tin để nhận giải thưởng của bạn",
    email_label: "Email (không bắt buộc)",
    email_placeholder: "ban@example.com",
    email_error: "Vui lòng nhập địa chỉ email hợp lệ.",
    phone_label: "Số điện thoại",
    phone_placeholder: "+84 234 567 890",
    phone_error: "Vui lòng nhập số điện thoại hợp lệ.",
    submit_info: "Nhận giải!",
    spin: "QUAY!",
    spinning: "Đang quay...",
    congratulations: "Chúc mừng!!!",
    you_won: "Bạn đã nhận được:",
    result_followup: "Chúng tôi sẽ liên hệ với bạn ngay về giải thưởng. Cảm ơn!",
    chances_title: "Giải thưởng",
    form_help: "Tab đổi ô | Enter gửi | F2 ngôn ngữ | Esc thoát",
    wheel_help: "Space/Enter quay | l ngôn ngữ | q thoát",
    result_help: "Enter tiếp tục | l ngôn ngữ | q thoát",
};

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Vi => &VI,
        }
    }

    /// The language the toggle switches to.
    pub fn next(self) -> Locale {
        match self {
            Locale::En => Locale::Vi,
            Locale::Vi => Locale::En,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::Vi => "VI",
        }
    }
}
