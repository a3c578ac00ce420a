//! Canned assistant replies for the lightweight `/api/chat` endpoint.
//!
//! Pure string templating keyed on the user's last message; no model call.

use rand::seq::IndexedRandom;

const NICHES: [&str; 6] = [
    "fitness",
    "cooking",
    "tech",
    "business",
    "lifestyle",
    "education",
];

/// Pick a reply for the user's last message.
#[must_use]
pub fn reply(last_message: &str) -> String {
    let message = last_message.to_lowercase();

    if message.contains("hook") || message.contains("opening") {
        return HOOKS_REPLY.to_string();
    }

    if message.contains("analyze") || message.contains("improve") || message.contains("script") {
        return SCRIPT_REPLY.to_string();
    }

    if message.contains("idea") || message.contains("brainstorm") || message.contains("content") {
        let niche = NICHES
            .iter()
            .find(|n| message.contains(*n))
            .copied()
            .unwrap_or("your niche");
        return brainstorm_reply(niche);
    }

    if message.contains("engagement") || message.contains("viral") || message.contains("algorithm")
    {
        return ENGAGEMENT_REPLY.to_string();
    }

    let general = [GENERAL_REPLY_A, GENERAL_REPLY_B, GENERAL_REPLY_C];
    (*general.choose(&mut rand::rng()).unwrap_or(&GENERAL_REPLY_A)).to_string()
}

const HOOKS_REPLY: &str = "Here are some powerful viral hooks you can use:

🔥 **Attention-Grabbing Hooks:**
• \"Stop scrolling! This will change everything...\"
• \"POV: You just discovered the secret that...\"
• \"Nobody talks about this, but...\"
• \"This took me 10 years to learn...\"
• \"The algorithm doesn't want you to see this...\"

💡 **Educational Hooks:**
• \"Here's what nobody tells you about...\"
• \"The science behind this will shock you...\"
• \"Everything you thought you knew is wrong...\"

🎯 **For your specific niche, try:**
• Starting with a bold statement
• Using numbers (\"3 secrets that...\")
• Creating urgency (\"Before it's too late...\")
• Asking a provocative question

What type of content are you creating? I can give you more targeted hooks!";

const SCRIPT_REPLY: &str = "I'd love to help improve your script! Here's what makes scripts go viral:

📝 **Script Structure:**
1. **Hook (0-3s):** Grab attention immediately
2. **Promise (3-5s):** Tell them what they'll learn
3. **Deliver (5-25s):** Provide the value
4. **CTA (25-30s):** Tell them what to do next

🎯 **Key Elements:**
• Start with a pattern interrupt
• Use \"you\" language to make it personal
• Include specific numbers/results
• Create curiosity gaps
• End with a clear call-to-action

📊 **Optimization Tips:**
• Keep sentences short and punchy
• Use trending phrases and slang
• Include emotional triggers
• Add visual cues for editing

Share your script and I'll give you specific feedback on how to make it more viral!";

fn brainstorm_reply(niche: &str) -> String {
    format!(
        "Let's brainstorm some viral content ideas for {niche}!

🚀 **Trending Formats:**
• \"Things I wish I knew before...\"
• \"POV: You're trying to...\"
• \"Day in my life as a...\"
• \"Rating viral {niche} hacks\"
• \"Beginner vs Pro {niche} mistakes\"

💡 **Content Pillars:**
• Educational (teach something valuable)
• Entertainment (make them laugh/smile)
• Inspiration (motivate and uplift)
• Behind-the-scenes (show your process)
• Trending challenges (put your spin on them)

🎯 **For {niche} specifically:**
• Common mistakes people make
• Quick tips and hacks
• Before/after transformations
• Myth-busting content
• Tool/product reviews

What specific aspect of {niche} are you most passionate about? I can help you develop \
that into viral content ideas!"
    )
}

const ENGAGEMENT_REPLY: &str = "Here's how to maximize engagement and work with the algorithm:

📈 **Algorithm Secrets:**
• Post consistently (same time daily)
• Use trending sounds and hashtags
• Engage with comments within first hour
• Create content that gets saved/shared
• Hook viewers in first 3 seconds

🎯 **Engagement Boosters:**
• Ask questions in your captions
• Use polls and interactive stickers
• Respond to every comment quickly
• Create content that sparks debate
• End with clear call-to-actions

⏰ **Timing Tips:**
• Post when your audience is most active
• Jump on trends early (within 24-48 hours)
• Use current events and pop culture references
• Create series content to bring people back

💬 **Community Building:**
• Share personal stories and struggles
• Show behind-the-scenes content
• Collaborate with other creators
• Create content that makes people feel seen

What's your current engagement rate? I can give you specific strategies to improve it!";

const GENERAL_REPLY_A: &str = "Great question! I'm here to help you create viral content. I can assist with:

🎬 **Script Writing:** Help you craft compelling hooks, body content, and CTAs
📊 **Content Strategy:** Brainstorm viral ideas for your niche
🔍 **Trend Analysis:** Explain what makes content go viral
💡 **Optimization:** Improve your existing scripts and ideas
🎯 **Engagement:** Strategies to boost views, likes, and shares

What specific area would you like to focus on? The more details you give me about your \
niche and goals, the better I can help!";

const GENERAL_REPLY_B: &str = "I love helping creators like you! Here are some ways I can assist:

✨ **Creative Brainstorming:** Generate fresh content ideas
📝 **Script Refinement:** Polish your scripts for maximum impact
🎯 **Hook Creation:** Craft attention-grabbing openings
📈 **Viral Strategy:** Understand what makes content spread
🎬 **Format Ideas:** Suggest trending video formats

Tell me more about your content niche and what you're struggling with. Are you looking \
to improve engagement, get more views, or create better scripts?";

const GENERAL_REPLY_C: &str = "Perfect! I'm your AI script assistant and I'm excited to help you create viral content.

🚀 **I can help you with:**
• Writing compelling hooks that stop the scroll
• Structuring scripts for maximum retention
• Brainstorming content ideas for your niche
• Analyzing what makes videos go viral
• Optimizing your content for the algorithm

What's your biggest challenge right now? Are you struggling with:
- Getting people to stop scrolling?
- Keeping viewers engaged throughout the video?
- Coming up with fresh content ideas?
- Understanding what your audience wants?

Let me know and I'll give you specific, actionable advice!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_branch() {
        let reply = reply("Give me a strong hook for my video");
        assert!(reply.contains("Attention-Grabbing Hooks"));
    }

    #[test]
    fn test_script_branch() {
        let reply = reply("Can you analyze my draft?");
        assert!(reply.contains("Script Structure"));
    }

    #[test]
    fn test_brainstorm_detects_niche() {
        let reply = reply("I need content ideas for my fitness page");
        assert!(reply.contains("fitness"));
        assert!(!reply.contains("your niche"));
    }

    #[test]
    fn test_brainstorm_without_niche() {
        let reply = reply("help me brainstorm");
        assert!(reply.contains("your niche"));
    }

    #[test]
    fn test_engagement_branch() {
        let reply = reply("how does the algorithm work?");
        assert!(reply.contains("Algorithm Secrets"));
    }

    #[test]
    fn test_general_fallback_is_nonempty() {
        // All three general replies offer help; which one is random.
        let reply = reply("hello there");
        assert!(reply.contains("I can"));
    }
}
